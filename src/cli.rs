use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::ArtifactKind;

#[derive(Parser, Debug)]
#[command(
    name = "geochat",
    version,
    about = "Response post-processing and artifact storage for the geospatial chat demo"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Extract(ExtractArgs),
    Render(RenderArgs),
    #[command(subcommand)]
    Artifacts(ArtifactCommands),
    Status(StatusArgs),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum StoreBackend {
    Sqlite,
    Json,
    Memory,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Json => "json",
            Self::Memory => "memory",
        }
    }

    fn default_file_name(self) -> &'static str {
        match self {
            Self::Sqlite => "artifacts.sqlite",
            Self::Json | Self::Memory => "artifacts.json",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    #[arg(long, default_value = ".cache/geochat")]
    pub cache_root: PathBuf,

    #[arg(long, value_enum, default_value_t = StoreBackend::Sqlite)]
    pub backend: StoreBackend,

    #[arg(long)]
    pub store_path: Option<PathBuf>,
}

impl StoreArgs {
    pub fn resolved_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| self.cache_root.join(self.backend.default_file_name()))
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(long)]
    pub input: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    #[arg(long)]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub conversation_id: Option<String>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Subcommand, Debug)]
pub enum ArtifactCommands {
    List(ArtifactListArgs),
    Show(ArtifactRefArgs),
    Delete(ArtifactRefArgs),
    Clear(ConversationArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConversationArgs {
    #[arg(long)]
    pub conversation_id: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ArtifactListArgs {
    #[arg(long)]
    pub conversation_id: String,

    #[arg(long, value_enum)]
    pub kind: Option<ArtifactKind>,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ArtifactRefArgs {
    #[arg(long)]
    pub conversation_id: String,

    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub store: StoreArgs,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}
