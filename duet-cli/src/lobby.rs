use anyhow::Result;
use colored::*;
use dialoguer::{Input, Select};
use duet::RoomId;
use duet::model::MissingRoomError;
use duet::peer::Lobby;

/// Terminal stand-in for the lobby page.
pub struct TerminalLobby;

impl Lobby for TerminalLobby {
    fn redirect(&self, reason: &MissingRoomError) {
        println!("{} {}", "🚪".yellow(), format!("{reason}, opening the lobby").yellow());
    }
}

impl TerminalLobby {
    pub fn choose_room(&self) -> Result<String> {
        let choice = Select::new()
            .with_prompt("Start or join a call")
            .items(&["Create a new room", "Join an existing room"])
            .default(0)
            .interact()?;

        if choice == 0 {
            let room = RoomId::generate();
            println!("{} {}", "✨ Share this room id:".cyan(), room.as_str().bold());
            return Ok(room.to_string());
        }

        let room: String = Input::new().with_prompt("Room id").interact_text()?;
        Ok(room)
    }
}
