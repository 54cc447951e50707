use std::process::ExitCode;

use gptfriend_lib::infrastructure::{init_tracing, AppEvent};
use gptfriend_lib::modules::chat::{ApplicationError, Message, TranscriptCursor};
use gptfriend_lib::modules::config::EnvOverrides;
use gptfriend_lib::shared::AppResult;
use gptfriend_lib::GptFriend;

use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "commands: /clear, /notify on|off, /quit";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> AppResult<()> {
    let app = GptFriend::bootstrap(&EnvOverrides::from_process()).await?;

    // 实时对话视图
    let mut transcript = app.chat().watch_messages();
    tokio::spawn(async move {
        let mut cursor = TranscriptCursor::new();
        while let Some(messages) = transcript.next().await {
            let update = cursor.advance(&messages);
            if update.cleared {
                println!("-- conversation cleared --");
            }
            for message in update.fresh {
                print_message(message);
            }
        }
    });

    let mut events = app.event_bus().subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let AppEvent::MissYou(text) = event {
                println!("🔔 {}", text);
            }
        }
    });

    app.start().await?;
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" => continue,
            "/quit" => break,
            "/clear" => {
                app.clear_conversation().await?;
            }
            "/notify on" => {
                app.set_notifications(true).await?;
                println!("notifications on");
            }
            "/notify off" => {
                app.set_notifications(false).await?;
                println!("notifications off");
            }
            command if command.starts_with('/') => println!("{}", HELP),
            text => match app.chat().send_user_message(text).await {
                Ok(_) => {}
                Err(ApplicationError::Validation(reason)) => println!("{}", reason),
                Err(e) => return Err(e.into()),
            },
        }
    }

    Ok(())
}

fn print_message(message: &Message) {
    let who = if message.is_user() { "you" } else { "friend" };
    println!("[{}] {}", who, message.text());
}
