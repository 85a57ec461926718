use crate::events::AppEvent;
use crate::script::{Command, parse_line};
use async_channel::Sender;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Forwards script lines as commands until the input ends. `wait` lines
/// pause the reader itself, so timers keep running in the meantime.
pub async fn run_reader<R>(reader: R, tx: Sender<AppEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut number = 0;

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read script: {}", e);
                break;
            }
        };
        number += 1;

        match parse_line(&line) {
            None => {}
            Some(Ok(Command::Wait(duration))) => tokio::time::sleep(duration).await,
            Some(Ok(command)) => {
                if tx.send(AppEvent::Command(command)).await.is_err() {
                    return;
                }
            }
            Some(Err(e)) => log::error!("line {}: {}", number, e),
        }
    }
}
