mod ascii;
mod play;

use std::time::{SystemTime, UNIX_EPOCH};

use canvas::config::{ConfigError, Endpoint};
use canvas::engine::SessionError;
use canvas::storage::StorageError;
use canvas::templates;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use wire::{GameMap, GameMapDto};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("websocket connect failed: {0}")]
    WsConnect(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("timed out waiting for the server")]
    Timeout,
    #[error("server returned {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("map decode failed: {0}")]
    Decode(#[from] wire::CodecError),
    #[error("unknown template `{0}`; expected empty or bordered")]
    UnknownTemplate(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::InvalidBaseUrl(url) => Self::InvalidBaseUrl(url),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "minigolf", about = "Minigolf game API and headless player")]
struct Cli {
    #[arg(long, env = "MINIGOLF_BASE_URL", default_value = "http://127.0.0.1:8080")]
    base_url: String,

    /// Player name used when joining a game.
    #[arg(long, env = "MINIGOLF_PLAYER_NAME")]
    name: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    name: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the server answers.
    Ping,
    Maps(MapsCommand),
    Game(GameCommand),
    /// Join a game and play it headlessly.
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct MapsCommand {
    #[command(subcommand)]
    command: MapsSubcommand,
}

#[derive(Subcommand, Debug)]
enum MapsSubcommand {
    List,
    Show {
        map_id: String,
        /// Draw the decoded map as a character grid instead of JSON.
        #[arg(long, default_value_t = false)]
        ascii: bool,
    },
    /// Print a starting map as DTO JSON.
    Template { name: String },
}

#[derive(Args, Debug)]
struct GameCommand {
    #[command(subcommand)]
    command: GameSubcommand,
}

#[derive(Subcommand, Debug)]
enum GameSubcommand {
    /// Start a game on a saved map and print its id.
    Create { map_id: String },
    /// Start a demo game on a template map and print its id.
    Demo {
        #[arg(default_value = "bordered")]
        template: String,
    },
    /// Check whether a game exists and can be joined.
    Check { game_id: String },
}

#[derive(Args, Debug)]
struct PlayArgs {
    game_id: String,

    /// Send IS_READY once the server has assigned an identity.
    #[arg(long, default_value_t = false)]
    ready: bool,

    /// Shoot at the hole whenever it is this player's turn.
    #[arg(long, default_value_t = false)]
    auto_shoot: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            eprintln!("ignoring .env: {error}");
        }
    }
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url, name: cli.name };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Maps(maps) => run_maps(&ctx, maps).await,
        Command::Game(game) => run_game(&ctx, game).await,
        Command::Play(args) => {
            let endpoint = Endpoint::from_base_url(&ctx.base_url)?;
            let options = play::PlayOptions { ready: args.ready, auto_shoot: args.auto_shoot };
            play::play(endpoint, &args.game_id, ctx.name.as_deref(), options).await
        }
    }
}

async fn run_ping(cli: &CliContext) -> Result<(), CliError> {
    api_get(cli, "/api/game-options").await?;
    println!("ok");
    Ok(())
}

async fn run_maps(cli: &CliContext, maps: MapsCommand) -> Result<(), CliError> {
    match maps.command {
        MapsSubcommand::List => {
            let json = api_get(cli, "/api/game-maps").await?;
            print_json(&json)
        }
        MapsSubcommand::Show { map_id, ascii } => {
            let json = api_get(cli, &format!("/api/game-maps/{}", encode(&map_id))).await?;
            if !ascii {
                return print_json(&json);
            }
            let dto: GameMapDto = serde_json::from_value(json)?;
            let map = GameMap::from_dto(&dto)?;
            println!("{} by {}", map.name, map.creator);
            print!("{}", ascii::render(&map));
            Ok(())
        }
        MapsSubcommand::Template { name } => {
            let dto = template_dto(&name)?;
            println!("{}", serde_json::to_string_pretty(&dto)?);
            Ok(())
        }
    }
}

async fn run_game(cli: &CliContext, game: GameCommand) -> Result<(), CliError> {
    match game.command {
        GameSubcommand::Create { map_id } => {
            let json = api_get(cli, &format!("/api/init-game/{}", encode(&map_id))).await?;
            println!("{}", game_id(&json)?);
            Ok(())
        }
        GameSubcommand::Demo { template } => {
            let dto = template_dto(&template)?;
            let url = api_url(cli, "/api/init-game");
            let response = reqwest::Client::new().post(url).json(&dto).send().await?;
            let json = read_json(response).await?;
            println!("{}", game_id(&json)?);
            Ok(())
        }
        GameSubcommand::Check { game_id } => {
            let url = api_url(cli, &format!("/api/game/{}", encode(&game_id)));
            let response = reqwest::get(url).await?;
            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(CliError::ServerError { status: status.as_u16(), message: body });
            }
            println!("{}", body.trim());
            Ok(())
        }
    }
}

fn template_dto(name: &str) -> Result<GameMapDto, CliError> {
    let tiles = templates::by_name(name).ok_or_else(|| CliError::UnknownTemplate(name.to_owned()))?;
    let map = GameMap { name: name.to_owned(), ..GameMap::from_tiles(tiles) };
    Ok(map.to_dto()?)
}

fn game_id(json: &Value) -> Result<&str, CliError> {
    json.get("gameId").and_then(Value::as_str).ok_or(CliError::MissingField("gameId"))
}

fn api_url(cli: &CliContext, path: &str) -> String {
    format!("{}{}", cli.base_url.trim_end_matches('/'), path)
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

async fn api_get(cli: &CliContext, path: &str) -> Result<Value, CliError> {
    let response = reqwest::get(api_url(cli, path)).await?;
    read_json(response).await
}

async fn read_json(response: reqwest::Response) -> Result<Value, CliError> {
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or_else(|_| Value::Null);
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: value.to_string() });
    }
    Ok(value)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

/// Wall-clock milliseconds since the epoch.
fn epoch_ms() -> u64 {
    let Ok(duration) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    u64::try_from(duration.as_millis()).unwrap_or(0)
}
