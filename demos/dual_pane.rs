use std::sync::Arc;

use async_trait::async_trait;
use pane_vfs::{
    BatchOutcome, Command, Commander, Config, DirFS, EntryType, FileSystemProvider, Interaction,
    MapFS, Outcome,
};
use tracing_subscriber::EnvFilter;

/// Says yes to everything and names every new directory `reports`.
struct AlwaysYes;

#[async_trait]
impl Interaction for AlwaysYes {
    async fn confirm(&self, message: &str) -> bool {
        println!("? {message} [y]");
        true
    }

    async fn prompt_for_text(&self, message: &str) -> Option<String> {
        println!("? {message} reports");
        Some("reports".into())
    }
}

fn print_panels(commander: &Commander) {
    for side in [pane_vfs::Side::Left, pane_vfs::Side::Right] {
        let panel = commander.panel(side);
        let marker = if side == commander.active_side() { "*" } else { " " };
        println!("{marker}{side:?} {}", panel.current_path().display());
        for (i, entry) in panel.entries().iter().enumerate() {
            let cursor = if i == panel.focused_index() { ">" } else { " " };
            let tag = if panel.is_selected(i) { "+" } else { " " };
            let suffix = if entry.is_dir() { "/" } else { "" };
            println!("  {cursor}{tag} {}{suffix}", entry.name());
        }
    }
}

async fn run(provider: Arc<dyn FileSystemProvider>, script: &[Command]) -> anyhow::Result<()> {
    let ui = AlwaysYes;
    let mut commander = Commander::open(provider, Config::default()).await?;

    for command in script {
        match commander.dispatch(command.clone(), &ui).await {
            Ok(Outcome::Batch(BatchOutcome::Completed(report))) => {
                println!("{}", report.summary("Processed"))
            }
            Ok(_) => {}
            Err(e) => println!("! {e}"),
        }
    }
    print_panels(&commander);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let script = [
        Command::SwitchPane,
        Command::TypeChar('d'),
        Command::Open,
        Command::SwitchPane,
        Command::TypeChar('n'),
        Command::ToggleFocused,
        Command::Copy,
        Command::MakeDirectory,
        Command::Delete { permanent: false },
    ];

    // Simulated tree.
    let map = MapFS::with_entries(
        "/home/demo",
        [
            ("/home/demo/docs", EntryType::Directory),
            ("/home/demo/notes.txt", EntryType::File),
            ("/home/demo/todo.md", EntryType::File),
        ],
    );
    println!("== MapFS ==");
    run(Arc::new(map), &script).await?;

    // Host tree under the temp dir; trashed entries land in `.trash`.
    let root = std::env::temp_dir().join("pane_vfs_demo");
    if root.exists() {
        std::fs::remove_dir_all(&root)?;
    }
    std::fs::create_dir_all(root.join("docs"))?;
    std::fs::write(root.join("notes.txt"), "Hello")?;
    std::fs::write(root.join("todo.md"), "World")?;

    let trash = root.join(".trash");
    std::fs::create_dir_all(&trash)?;
    let dir = DirFS::with_home(&root).with_trash_handler(move |path| {
        let trash = trash.clone();
        async move {
            let name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("cannot trash {}", path.display()))?;
            tokio::fs::rename(&path, trash.join(name)).await?;
            Ok::<(), anyhow::Error>(())
        }
    });
    println!("== DirFS ==");
    run(Arc::new(dir), &script).await?;

    std::fs::remove_dir_all(&root)?;
    Ok(())
}
