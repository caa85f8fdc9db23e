//! Request/reply channel between the UI and the host
//!
//! One JSON object per line in each direction:
//!
//! ```text
//! -> {"seq": 4, "op": "launch-game", "path": "/games/hades/Hades"}
//! <- {"seq": 4, "success": false, "error": "Game is already running: /games/hades/Hades"}
//! ```

use crate::navigation::NavigationOutcome;
use crate::{Host, HostError};
use gameshelf_config::Palette;
use gameshelf_library::{GameId, GameMap, GameRecord, ListedGame, SortMode, TitleMatch};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

fn default_true() -> bool {
    true
}

/// Operations the UI can request
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Request {
    LoadGames,
    SaveGame {
        details: GameRecord,
    },
    UpdateGame {
        id: GameId,
        details: GameRecord,
    },
    RemoveGame {
        id: GameId,
    },
    GetInstallSize {
        path: String,
    },
    GameInstallSize {
        id: GameId,
    },
    LaunchGame {
        path: String,
    },
    Goto {
        page: String,
        #[serde(default = "default_true", rename = "addToHistory")]
        add_to_history: bool,
    },
    Back,
    Forward,
    GetHistory,
    CurrentPage,
    SelectExecutable,
    SelectImage,
    GetThemes,
    ListGames {
        #[serde(default)]
        sort: SortMode,
        #[serde(default)]
        tag: Option<String>,
    },
    SearchTitles {
        query: String,
    },
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    seq: u64,
    #[serde(flatten)]
    request: Request,
}

/// Successful reply payload, flattened next to `seq`/`success`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Games { games: GameMap },
    Saved { id: GameId },
    Size { size: u64 },
    Launched { pid: u32 },
    Navigation(NavigationOutcome),
    Page { page: Option<String> },
    Picked { path: Option<PathBuf> },
    Themes { themes: BTreeMap<String, Palette> },
    Listing { games: Vec<ListedGame> },
    Suggestions { suggestions: Vec<TitleMatch> },
}

#[derive(Debug, Serialize)]
pub struct Reply {
    pub seq: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub body: Option<Outcome>,
}

impl Reply {
    pub fn ok(seq: u64, body: Option<Outcome>) -> Self {
        Self {
            seq,
            success: true,
            error: None,
            body,
        }
    }

    pub fn failed(seq: u64, error: &HostError) -> Self {
        Self {
            seq,
            success: false,
            error: Some(error.to_string()),
            body: None,
        }
    }
}

/// Run one request against the host
pub async fn dispatch(host: &mut Host, request: Request) -> Result<Option<Outcome>, HostError> {
    let outcome = match request {
        Request::LoadGames => Outcome::Games {
            games: host.load_games(),
        },
        Request::SaveGame { details } => Outcome::Saved {
            id: host.save_game(details)?,
        },
        Request::UpdateGame { id, details } => {
            host.update_game(&id, details)?;
            return Ok(None);
        }
        Request::RemoveGame { id } => {
            host.remove_game(&id)?;
            return Ok(None);
        }
        Request::GetInstallSize { path } => Outcome::Size {
            size: host.install_size(&path).await?,
        },
        Request::GameInstallSize { id } => Outcome::Size {
            size: host.game_install_size(&id).await?,
        },
        Request::LaunchGame { path } => Outcome::Launched {
            pid: host.launch_game(&path)?,
        },
        Request::Goto {
            page,
            add_to_history,
        } => Outcome::Navigation(host.goto(&page, add_to_history)),
        Request::Back => Outcome::Navigation(host.back()),
        Request::Forward => Outcome::Navigation(host.forward()),
        Request::GetHistory => Outcome::Navigation(NavigationOutcome {
            history: host.history(),
            load: None,
        }),
        Request::CurrentPage => Outcome::Page {
            page: host.current_page(),
        },
        Request::SelectExecutable => Outcome::Picked {
            path: host.select_executable().await?,
        },
        Request::SelectImage => Outcome::Picked {
            path: host.select_image().await?,
        },
        Request::GetThemes => Outcome::Themes {
            themes: host.themes().themes,
        },
        Request::ListGames { sort, tag } => Outcome::Listing {
            games: host.list_games(sort, tag.as_deref()),
        },
        Request::SearchTitles { query } => Outcome::Suggestions {
            suggestions: host.search_titles(&query),
        },
    };

    Ok(Some(outcome))
}

/// Parse and run one request line; failures become `success: false` replies
pub async fn handle_line(host: &mut Host, line: &str) -> Reply {
    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => return Reply::failed(0, &HostError::BadRequest(e.to_string())),
    };

    let seq = value.get("seq").and_then(|s| s.as_u64()).unwrap_or(0);

    let envelope: Envelope = match serde_json::from_value(value) {
        Ok(envelope) => envelope,
        Err(e) => return Reply::failed(seq, &HostError::BadRequest(e.to_string())),
    };

    match dispatch(host, envelope.request).await {
        Ok(body) => Reply::ok(envelope.seq, body),
        Err(e) => {
            tracing::warn!("Request {} failed: {}", envelope.seq, e);
            Reply::failed(envelope.seq, &e)
        }
    }
}

/// Serve requests until the reader reaches EOF
pub async fn serve<R, W>(host: &mut Host, mut reader: R, mut writer: W) -> Result<(), HostError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let reply = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(host, line.trim_end()).await,
            Err(e) => Reply::failed(0, &HostError::BadRequest(e.to_string())),
        };

        let mut out = serde_json::to_vec(&reply)?;
        out.push(b'\n');
        writer.write_all(&out).await?;
        writer.flush().await?;
    }

    tracing::debug!("Request channel closed");
    Ok(())
}
