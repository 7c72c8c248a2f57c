/**
 * Canvas Client Entry Point
 *
 * Joins the canvas as a participant and logs what happens to it.
 *
 * Usage: canvas-client <username> [x y color]
 *
 * With coordinates and a color it places one pixel after the first
 * snapshot arrives. Runs until Ctrl-C.
 */
use canvas_sync::client::{CanvasSession, ClientConfig, SessionEvent};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let username = args.first().cloned();
    let placement = match &args[..] {
        [_, x, y, color] => Some((x.parse::<i64>()?, y.parse::<i64>()?, color.clone())),
        [_] | [] => None,
        _ => {
            eprintln!("Usage: canvas-client <username> [x y color]");
            std::process::exit(2);
        }
    };

    let config = ClientConfig::from_env()?;
    let session = CanvasSession::start(config, username)?;
    let mut events = session.subscribe();

    if let Some((x, y, color)) = placement {
        session.refresh().await?;
        match session.place_pixel(x, y, &color).await {
            Ok(outcome) => tracing::info!("Placement result: {:?}", outcome),
            Err(e) => tracing::warn!("Placement failed: {}", e),
        }
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown signal received");
                break;
            }
            event = events.recv() => match event {
                Ok(SessionEvent::CooldownTick { display: countdown, .. }) => {
                    tracing::info!("Next pixel in {}", countdown)
                }
                Ok(event) => tracing::info!("{:?}", event),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                    tracing::debug!("Missed {} session events", n)
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    session.shutdown().await;
    Ok(())
}
