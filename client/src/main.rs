use clap::Parser;
use log::{error, info};

use client::app::{self, LobbyOutcome, MatchOutcome};
use client::session::{PlayerProfile, Session, CREATE_ROOM_RETRIES, JOIN_ROOM_RETRIES};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Arena server address (host:port)
    #[arg(short = 's', long, default_value = "127.0.0.1:3000")]
    server: String,

    /// Player display name (truncated to 20 characters)
    #[arg(short = 'n', long, default_value = "Player")]
    name: String,

    /// Player color as a hex string
    #[arg(short = 'c', long, default_value = "#3b82f6")]
    color: String,

    /// Join an existing room instead of creating one
    #[arg(short = 'j', long)]
    join: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let mut session = Session::new(
        format!("http://{}", args.server),
        format!("ws://{}", args.server),
    );
    let profile = PlayerProfile::new(&args.name, &args.color);

    let room_id = match args.join {
        Some(room_id) => session.join_room(&profile, room_id, JOIN_ROOM_RETRIES).await,
        None => session.create_room(&profile, CREATE_ROOM_RETRIES).await,
    };

    let Some(room_id) = room_id else {
        error!("could not enter a room, giving up");
        return Ok(());
    };

    info!("entered room {room_id} as player {:?}", session.player_id());
    info!("Controls: arrow keys or WASD to move, Space to shoot");

    match app::run_lobby(&mut session).await {
        LobbyOutcome::Started => {
            info!("match starting in room {room_id}");
            match app::run_match(&mut session).await {
                MatchOutcome::Kicked { kills } => {
                    info!(
                        "game over: player {:?} finished with {kills} kills",
                        session.player_id()
                    );
                }
                MatchOutcome::Disconnected => info!("connection lost, back to the entry point"),
            }
        }
        LobbyOutcome::Kicked => info!("kicked from room {room_id}"),
        LobbyOutcome::Disconnected => info!("connection lost in the lobby"),
    }

    session.leave_room().await;
    Ok(())
}
