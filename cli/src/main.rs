use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use bridge::{BridgeConfig, BridgeHandle, Headless};
use clap::Parser;
use common::{ContainerId, ContentHash, ObjectStore};
use proto::ui::{
    fs_operation, BlockListRequest, DownloadContainerOptions, FsOperation, LogCategory,
    LogRequest, ObjectFromDiskOptions, PublishingOptions, SearchRequest, UsageRequest,
};
use proto::NodeServiceClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;

#[derive(Debug, Parser)]
#[command(name = "dfs", version, about = "Browse and manage a dfs node")]
struct Args {
    /// gRPC endpoint of the node's UI service
    #[arg(
        long = "node",
        env = "DFS_NODE_URI",
        default_value = "http://[::1]:10000",
        global = true
    )]
    node_uri: String,

    /// Seconds to wait for any single operation
    #[arg(
        long = "timeout",
        env = "DFS_TIMEOUT_SECS",
        default_value_t = 30,
        global = true
    )]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            node_uri: self.node_uri.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..BridgeConfig::default()
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
struct Tracker {
    /// Tracker to talk to
    #[arg(long)]
    tracker: String,
}

#[derive(Debug, Clone, clap::Args)]
struct Entry {
    container: ContainerId,
    /// Object to change
    target: ContentHash,
    /// Folder the object is listed in
    parent: ContentHash,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Level {
    Info,
    Error,
    Warning,
    Debug,
    Trace,
}

impl From<Level> for LogCategory {
    fn from(level: Level) -> Self {
        match level {
            Level::Info => LogCategory::Info,
            Level::Error => LogCategory::Error,
            Level::Warning => LogCategory::Warning,
            Level::Debug => LogCategory::Debug,
            Level::Trace => LogCategory::Trace,
        }
    }
}

#[derive(Debug, Clone, clap::Subcommand)]
enum Command {
    /// List every container the node holds
    Containers,
    /// Draw one container, or all of them
    Tree { container: Option<ContainerId> },
    /// Print the root hash of a container
    RootHash { container: ContainerId },
    /// Print where an object lives on the node's disk
    Path { hash: ContentHash },
    /// Ask the node to show an object in its file browser
    Reveal { hash: ContentHash },
    /// Import a file or folder from the node's disk as a new container
    Import {
        path: PathBuf,
        #[arg(long, default_value_t = 1 << 20)]
        chunk_size: i32,
    },
    /// Publish a container to a tracker
    Publish {
        container: ContainerId,
        #[command(flatten)]
        tracker: Tracker,
    },
    /// Download a container found on a tracker
    Download {
        container: ContainerId,
        #[command(flatten)]
        tracker: Tracker,
        /// Directory on the node to download into
        #[arg(long)]
        destination: PathBuf,
        #[arg(long, default_value_t = 8)]
        max_concurrent_chunks: i32,
    },
    Pause { container: ContainerId },
    Resume { container: ContainerId },
    Cancel { container: ContainerId },
    /// Print download progress of an object
    Progress { hash: ContentHash },
    /// Search a tracker for objects
    Search {
        query: String,
        #[command(flatten)]
        tracker: Tracker,
    },
    /// Print data exchanged with a tracker
    Usage {
        #[command(flatten)]
        tracker: Tracker,
    },
    /// Stop talking to a peer or tracker
    Block { url: String },
    Unblock { url: String },
    BlockList,
    /// Write a line to the node's log
    Log {
        #[arg(long, value_enum, default_value = "info")]
        level: Level,
        message: String,
    },
    /// Ask the node to show its log file
    RevealLog,
    Rename {
        #[command(flatten)]
        entry: Entry,
        name: String,
    },
    Move {
        #[command(flatten)]
        entry: Entry,
        /// Folder to move into
        to: ContentHash,
    },
    Copy {
        #[command(flatten)]
        entry: Entry,
        /// Folder to copy into
        to: ContentHash,
    },
    Delete {
        #[command(flatten)]
        entry: Entry,
    },
    /// Stop the node
    Shutdown,
}

fn fs_request(entry: Entry, operation: fs_operation::Operation) -> FsOperation {
    FsOperation {
        container_guid: entry.container.to_string(),
        target: entry.target.as_bytes().to_vec(),
        parent: entry.parent.as_bytes().to_vec(),
        operation: Some(operation),
    }
}

fn path_string(path: PathBuf) -> anyhow::Result<String> {
    path.into_os_string()
        .into_string()
        .map_err(|path| anyhow::anyhow!("path is not valid unicode: {path:?}"))
}

async fn run(command: Command, handle: BridgeHandle) -> anyhow::Result<()> {
    let store = ObjectStore::new(NodeServiceClient::new(handle));
    let client = store.client();

    match command {
        Command::Containers => {
            for container in store.list_containers().await? {
                println!("{container}");
            }
        }
        Command::Tree { container: Some(container) } => {
            println!("{}", render::tree(&store.container_tree(container).await?));
        }
        Command::Tree { container: None } => {
            let drive = store.drive().await?;
            for tree in &drive.containers {
                println!("{}", render::tree(tree));
            }
        }
        Command::RootHash { container } => println!("{}", store.root_hash(container).await?),
        Command::Path { hash } => {
            println!("{}", client.get_object_path(hash.to_proto()).await?.path)
        }
        Command::Reveal { hash } => client.reveal_object_in_explorer(hash.to_proto()).await?,
        Command::Import { path, chunk_size } => {
            let container = client
                .import_object_from_disk(ObjectFromDiskOptions {
                    path: path_string(path)?,
                    chunk_size,
                })
                .await?;
            println!("{}", container.guid);
        }
        Command::Publish { container, tracker } => {
            client
                .publish_to_tracker(PublishingOptions {
                    container_guid: container.to_string(),
                    tracker_uri: tracker.tracker,
                })
                .await?
        }
        Command::Download {
            container,
            tracker,
            destination,
            max_concurrent_chunks,
        } => {
            client
                .download_container(DownloadContainerOptions {
                    container_guid: container.to_string(),
                    tracker_uri: tracker.tracker,
                    destination_dir: path_string(destination)?,
                    max_concurrent_chunks,
                })
                .await?
        }
        Command::Pause { container } => {
            client
                .pause_container_download(container.to_proto())
                .await?
        }
        Command::Resume { container } => {
            client
                .resume_container_download(container.to_proto())
                .await?
        }
        Command::Cancel { container } => {
            client
                .cancel_container_download(container.to_proto())
                .await?
        }
        Command::Progress { hash } => {
            let progress = client.get_download_progress(hash.to_proto()).await?;
            println!("{}", render::progress(&progress));
        }
        Command::Search { query, tracker } => {
            let found = client
                .search_for_objects(SearchRequest {
                    tracker_uri: tracker.tracker,
                    query,
                })
                .await?;
            for result in found.results {
                let name = result.root.map(|root| root.name).unwrap_or_default();
                println!("{}\t{name}", result.container_guid);
            }
        }
        Command::Usage { tracker } => {
            let usage = client
                .get_data_usage(UsageRequest {
                    tracker_uri: tracker.tracker,
                })
                .await?;
            let size = |bytes: i64| render::human_size(bytes.max(0) as u64);
            println!("upload\t{}\ndownload\t{}", size(usage.upload), size(usage.download));
        }
        Command::Block { url } => {
            client
                .modify_block_list_entry(BlockListRequest {
                    url,
                    should_remove: false,
                })
                .await?
        }
        Command::Unblock { url } => {
            client
                .modify_block_list_entry(BlockListRequest {
                    url,
                    should_remove: true,
                })
                .await?
        }
        Command::BlockList => {
            for entry in client.get_block_list().await?.entries {
                println!("{entry}");
            }
        }
        Command::Log { level, message } => {
            client
                .log_message(LogRequest {
                    category: LogCategory::from(level).into(),
                    message,
                })
                .await?
        }
        Command::RevealLog => client.reveal_log_file().await?,
        Command::Rename { entry, name } => {
            client
                .apply_fs_operation(fs_request(entry, fs_operation::Operation::Rename(name)))
                .await?
        }
        Command::Move { entry, to } => {
            let operation = fs_operation::Operation::MoveTo(to.as_bytes().to_vec());
            client.apply_fs_operation(fs_request(entry, operation)).await?
        }
        Command::Copy { entry, to } => {
            let operation = fs_operation::Operation::CopyTo(to.as_bytes().to_vec());
            client.apply_fs_operation(fs_request(entry, operation)).await?
        }
        Command::Delete { entry } => {
            client
                .apply_fs_operation(fs_request(entry, fs_operation::Operation::Delete(true)))
                .await?
        }
        Command::Shutdown => client.shutdown().await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let (handle, host) = bridge::connect(&args.bridge_config(), Headless::default())
        .context("setting up the bridge")?;
    let host = tokio::spawn(host.run());
    info!(node = %args.node_uri, "bridge ready");

    let result = run(args.command, handle).await;
    // The handle went with `run`, so the host winds down on its own.
    host.await?;
    result
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    const DOCS: &str = "2f0c4a1e-0000-4000-8000-000000000001";

    #[test]
    fn arguments_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn rename_takes_an_entry_and_a_name() {
        let target = "ab".repeat(64);
        let parent = "cd".repeat(64);
        let args = Args::try_parse_from([
            "dfs", "--node", "http://node:1", "rename", DOCS, &target, &parent, "notes.txt",
        ])
        .unwrap();

        assert_eq!(args.bridge_config().node_uri, "http://node:1");
        let Command::Rename { entry, name } = args.command else {
            panic!("expected a rename");
        };
        assert_eq!(name, "notes.txt");
        let request = fs_request(entry, fs_operation::Operation::Rename(name));
        assert_eq!(request.container_guid, DOCS);
        assert_eq!(request.target, vec![0xab; 64]);
        assert_eq!(request.parent, vec![0xcd; 64]);
    }

    #[test]
    fn malformed_ids_are_usage_errors() {
        assert!(Args::try_parse_from(["dfs", "root-hash", "not-a-guid"]).is_err());
        assert!(Args::try_parse_from(["dfs", "path", "abcd"]).is_err());
        assert!(Args::try_parse_from(["dfs", "tree"]).is_ok());
    }
}
