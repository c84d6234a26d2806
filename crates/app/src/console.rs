//! Line-oriented console loop

use tokio::io::{self, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use crate::state::AppState;
use crate::viewmodel::{self, Reply};

const PROMPT: &str = "cloudboard> ";

/// Read commands from stdin until `quit` or end of input
pub async fn run(state: &AppState) -> io::Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut out = io::stdout();

    greet(state, &mut out).await?;

    loop {
        out.write_all(PROMPT.as_bytes()).await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        debug!(len = line.len(), "Read console line");

        match viewmodel::dispatch(state, &line).await {
            Ok(Reply::Quit) => break,
            Ok(Reply::Text(text)) if text.is_empty() => {}
            Ok(Reply::Text(text)) => write_line(&mut out, &text).await?,
            Err(e) => write_line(&mut out, &format!("error: {e}")).await?,
        }
    }

    info!("Console closed");
    Ok(())
}

async fn greet<W: AsyncWrite + Unpin>(state: &AppState, out: &mut W) -> io::Result<()> {
    let banner = match state.session.current_user() {
        Some(user) => format!("Cloudboard: signed in as {} <{}>", user.name, user.email),
        None => "Cloudboard: not signed in, use 'login <email> <password>'".to_string(),
    };
    write_line(out, &banner).await
}

async fn write_line<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> io::Result<()> {
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}
