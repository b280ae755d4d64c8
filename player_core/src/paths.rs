//! Path table and request dispatch
//!
//! | Path            | Operations            |
//! |-----------------|-----------------------|
//! | *(root)*        | list                  |
//! | `{name}`        | read, create, update, delete |
//! | `{name}/stats`  | read, create, update  |
//! | `{name}/level`  | read                  |
//! | `{name}/{key}`  | read                  |

use crate::error::{PlayerError, Result};
use crate::handlers::PlayerBackend;
use crate::request::{Operation, Request, Response};
use tracing::debug;

/// A resolved request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerPath {
    Root,
    Player { name: String },
    Stats { name: String },
    Level { name: String },
    Field { name: String, key: String },
}

/// Help text attached to each path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathHelp {
    pub synopsis: &'static str,
    pub description: &'static str,
}

const ROOT_HELP: PathHelp = PathHelp {
    synopsis: "List the stored players.",
    description: "Returns the names of every player record under this backend.",
};

const PLAYER_HELP: PathHelp = PathHelp {
    synopsis: "Manage a player record.",
    description: "Read, write and delete a player's class and experience. \
                  Creating a player requires both. Reads include the derived \
                  level and a reference to the stats sub-path.",
};

const STATS_HELP: PathHelp = PathHelp {
    synopsis: "Manage a player's stats.",
    description: "Read and write strength and dexterity. Creating the stats \
                  requires both; afterwards either may be updated alone.",
};

const LEVEL_HELP: PathHelp = PathHelp {
    synopsis: "Read a player's level.",
    description: "The level is the integer square root of experience and is \
                  never stored.",
};

const FIELD_HELP: PathHelp = PathHelp {
    synopsis: "Read a single player field.",
    description: "Returns class, experience or stats as text. Any other key \
                  is rejected.",
};

impl PlayerPath {
    /// Resolve a path relative to the backend mount
    ///
    /// `stats` and `level` take precedence over the generic `{key}` segment.
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(PlayerPath::Root);
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(PlayerError::UnknownPath(path.to_string()));
        }

        let name = segments[0].to_string();
        match &segments[1..] {
            [] => Ok(PlayerPath::Player { name }),
            [sub] if sub.eq_ignore_ascii_case("stats") => Ok(PlayerPath::Stats { name }),
            [sub] if sub.eq_ignore_ascii_case("level") => Ok(PlayerPath::Level { name }),
            [key] => Ok(PlayerPath::Field {
                name,
                key: key.to_string(),
            }),
            _ => Err(PlayerError::UnknownPath(path.to_string())),
        }
    }

    /// Operations this path accepts
    pub fn operations(&self) -> &'static [Operation] {
        match self {
            PlayerPath::Root => &[Operation::List],
            PlayerPath::Player { .. } => &[
                Operation::Read,
                Operation::Create,
                Operation::Update,
                Operation::Delete,
            ],
            PlayerPath::Stats { .. } => &[Operation::Read, Operation::Create, Operation::Update],
            PlayerPath::Level { .. } | PlayerPath::Field { .. } => &[Operation::Read],
        }
    }

    pub fn help(&self) -> PathHelp {
        match self {
            PlayerPath::Root => ROOT_HELP,
            PlayerPath::Player { .. } => PLAYER_HELP,
            PlayerPath::Stats { .. } => STATS_HELP,
            PlayerPath::Level { .. } => LEVEL_HELP,
            PlayerPath::Field { .. } => FIELD_HELP,
        }
    }
}

impl PlayerBackend {
    /// Route a request to its handler
    pub fn handle(&self, request: &Request) -> Result<Option<Response>> {
        debug!(
            target: "player::backend",
            operation = %request.operation,
            path = %request.path,
            "Handling request"
        );

        let path = PlayerPath::parse(&request.path)?;
        if !path.operations().contains(&request.operation) {
            return Err(PlayerError::UnsupportedOperation {
                operation: request.operation.to_string(),
                path: request.path.clone(),
            });
        }

        let fields = request.fields();
        match (&path, request.operation) {
            (PlayerPath::Root, Operation::List) => self.list_players(),
            (PlayerPath::Player { name }, Operation::Read) => self.read_player(name),
            (PlayerPath::Player { name }, Operation::Create | Operation::Update) => {
                self.write_player(name, fields)
            }
            (PlayerPath::Player { name }, Operation::Delete) => self.delete_player(name),
            (PlayerPath::Stats { name }, Operation::Read) => self.read_stats(name),
            (PlayerPath::Stats { name }, Operation::Create | Operation::Update) => {
                self.write_stats(name, fields)
            }
            (PlayerPath::Level { name }, Operation::Read) => self.read_level(name),
            (PlayerPath::Field { name, key }, Operation::Read) => self.read_field(name, key),
            (_, operation) => Err(PlayerError::InvalidState(format!(
                "no handler for {} on '{}'",
                operation, request.path
            ))),
        }
    }
}
