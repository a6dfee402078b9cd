mod samples;

use std::time::Duration;

use canvas::consts::DEFAULT_ENDPOINT;
use canvas::{DrawOp, RealtimePaintClient, RecordingSurface, Transport, TransportError};
use clap::{Args, Parser, Subcommand};
use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::samples::{SampleError, parse_sample_line};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Client = RealtimePaintClient<RecordingSurface, ChannelTransport>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input line {line}: {source}")]
    Input { line: usize, source: SampleError },
}

#[derive(Parser, Debug)]
#[command(name = "paint-cli", about = "Realtime paint relay client")]
struct Cli {
    #[arg(long, env = "PAINT_URL", default_value = DEFAULT_ENDPOINT)]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay drag samples as local paint and send them to the relay.
    Paint(PaintArgs),
    /// Paint every point the relay broadcasts, one JSON draw op per line.
    Listen(ListenArgs),
}

#[derive(Args, Debug)]
struct PaintArgs {
    #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
    input: String,

    #[arg(long, default_value_t = 0, help = "Pause between samples, in milliseconds")]
    delay_ms: u64,

    #[arg(long, default_value_t = false, help = "Stop at the first unparseable line")]
    strict: bool,

    #[arg(long, default_value_t = 1920)]
    width: u32,

    #[arg(long, default_value_t = 1080)]
    height: u32,
}

#[derive(Args, Debug)]
struct ListenArgs {
    #[arg(long, help = "Stop after painting this many points")]
    max: Option<usize>,

    #[arg(long, help = "Stop after this many seconds")]
    timeout_secs: Option<u64>,

    #[arg(long, default_value_t = 1920)]
    width: u32,

    #[arg(long, default_value_t = 1080)]
    height: u32,
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// [`Transport`] that queues frames for the socket writer task.
struct ChannelTransport {
    tx: mpsc::UnboundedSender<String>,
}

impl Transport for ChannelTransport {
    fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        self.tx.send(text.to_owned()).map_err(|_| TransportError::Closed)
    }
}

/// Forward queued frames to the socket until every sender is dropped, then
/// close the socket.
fn spawn_writer(
    mut sink: futures_util::stream::SplitSink<Socket, Message>,
    mut rx: mpsc::UnboundedReceiver<String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            if let Err(error) = sink.send(Message::text(text)).await {
                warn!(%error, "ws send failed");
                return;
            }
        }
        if let Err(error) = sink.close().await {
            debug!(%error, "ws close failed");
        }
    })
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Paint(args) => run_paint(&cli.url, args).await,
        Command::Listen(args) => run_listen(&cli.url, args).await,
    }
}

/// Connect, then hand back an open client, the inbound half, and the writer.
async fn connect(url: &str, width: u32, height: u32) -> Result<(Client, SplitStream<Socket>, JoinHandle<()>), CliError> {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut client = RealtimePaintClient::new(RecordingSurface::new(), ChannelTransport { tx });
    client.setup(width, height);

    let stream = match connect_async(url).await {
        Ok((stream, _)) => stream,
        Err(error) => {
            client.on_close();
            return Err(CliError::WsConnect(Box::new(error)));
        }
    };
    client.on_open();

    let (sink, read) = stream.split();
    let writer = spawn_writer(sink, rx);
    Ok((client, read, writer))
}

async fn run_paint(url: &str, args: PaintArgs) -> Result<(), CliError> {
    let (mut client, mut read, writer) = connect(url, args.width, args.height).await?;

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = if args.input == "-" {
        Box::new(BufReader::new(tokio::io::stdin()))
    } else {
        Box::new(BufReader::new(tokio::fs::File::open(&args.input).await?))
    };
    let mut lines = reader.lines();

    let mut line_no = 0_usize;
    let mut samples = 0_usize;
    let mut unsent = 0_usize;
    let mut skipped = 0_usize;
    let mut received = 0_usize;
    let mut inbound_open = true;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                line_no += 1;
                let (x, y) = match parse_sample_line(&line) {
                    Ok(Some(sample)) => sample,
                    Ok(None) => continue,
                    Err(source) if args.strict => return Err(CliError::Input { line: line_no, source }),
                    Err(error) => {
                        warn!(line = line_no, %error, "skipping input line");
                        skipped += 1;
                        continue;
                    }
                };
                samples += 1;
                if let Err(error) = client.mouse_dragged(x, y) {
                    debug!(x, y, %error, "drag sample not sent");
                    unsent += 1;
                }
                if args.delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(args.delay_ms)).await;
                }
            }
            msg = read.next(), if inbound_open => {
                if handle_inbound(&mut client, msg) {
                    received += 1;
                } else if client.state() == canvas::ConnectionState::Closed {
                    inbound_open = false;
                }
            }
        }
    }

    let sent = client.sent_count();
    // Dropping the client drops the last sender, letting the writer flush and close.
    drop(client);
    if let Err(error) = writer.await {
        warn!(%error, "writer task failed");
    }

    info!(samples, sent, unsent, skipped, received, "paint complete");
    Ok(())
}

async fn run_listen(url: &str, args: ListenArgs) -> Result<(), CliError> {
    let (mut client, mut read, writer) = connect(url, args.width, args.height).await?;

    let mut painted = 0_usize;
    let listen = async {
        while client.state() != canvas::ConnectionState::Closed {
            let msg = read.next().await;
            if !handle_inbound(&mut client, msg) {
                continue;
            }
            for op in client.surface_mut().take_ops() {
                if matches!(op, DrawOp::Ellipse { .. }) {
                    println!("{}", op.to_json());
                }
            }
            painted += 1;
            if args.max.is_some_and(|max| painted >= max) {
                break;
            }
        }
    };

    match args.timeout_secs {
        Some(secs) => {
            if tokio::time::timeout(Duration::from_secs(secs), listen).await.is_err() {
                info!(secs, "listen timeout reached");
            }
        }
        None => listen.await,
    }

    drop(client);
    if let Err(error) = writer.await {
        warn!(%error, "writer task failed");
    }
    info!(painted, "listen complete");
    Ok(())
}

/// Feed one inbound socket event to the client. Returns `true` if a point
/// was painted.
fn handle_inbound(client: &mut Client, msg: Option<Result<Message, tokio_tungstenite::tungstenite::Error>>) -> bool {
    match msg {
        Some(Ok(Message::Text(text))) => match client.on_message(text.as_str()) {
            Ok(_) => true,
            Err(error) => {
                warn!(%error, "dropping inbound frame");
                false
            }
        },
        Some(Ok(Message::Close(_))) | None => {
            client.on_close();
            false
        }
        Some(Err(error)) => {
            warn!(%error, "ws receive failed");
            client.on_close();
            false
        }
        Some(Ok(_)) => false,
    }
}
