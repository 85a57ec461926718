mod config;
mod events;
mod script;
mod sys;

use crate::config::ItemConfig;
use crate::events::AppEvent;
use crate::sys::reader::run_reader;
use crate::sys::runtime::Runtime;
use clap::{Parser, Subcommand};
use orbit::RadialMenu;
use std::path::PathBuf;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "orbitctl", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Menu definition to use instead of the one in the config directory
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Drive a headless menu from a script and print its notifications.
    Run {
        /// Read commands from this file instead of stdin
        #[arg(short = 's', long)]
        script: Option<PathBuf>,

        /// Reload the menu definition when it changes
        #[arg(short = 'w', long)]
        watch: bool,
    },
    /// Validate the menu definition and print the item tree.
    Check,
    /// Write the default menu definition.
    Init,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    match cli.command {
        Commands::Init => {
            let path = config::write_default_config(&config_path)?;
            println!("{}", path.display());
        }
        Commands::Check => {
            let app = config::load_config(&config_path)?;
            app.menu.validate()?;
            print_tree(&app.items, 0);
        }
        Commands::Run { script, watch } => run(config_path, script, watch).await?,
    }
    Ok(())
}

async fn run(config_path: PathBuf, script: Option<PathBuf>, watch: bool) -> anyhow::Result<()> {
    let app = config::load_or_default(&config_path);
    let items = app.build_items(&config::base_dir(&config_path));
    let mut menu = RadialMenu::new(app.menu_config(), items)?;
    menu.set_viewport(app.viewport);

    let (tx, rx) = async_channel::bounded(32);

    if watch {
        let tx = tx.clone();
        let path = config_path.clone();
        tokio::spawn(async move {
            config::run_async_watcher(path, tx).await;
        });
    }

    {
        let tx = tx.clone();
        let file = match &script {
            Some(path) => Some(fs_err::tokio::File::open(path).await?),
            None => None,
        };
        tokio::spawn(async move {
            match file {
                Some(file) => run_reader(BufReader::new(file), tx.clone()).await,
                None => run_reader(BufReader::new(tokio::io::stdin()), tx.clone()).await,
            }
            if !watch {
                let _ = tx.send(AppEvent::Quit).await;
            }
        });
    }

    Runtime::new(menu, config_path, tx).run(rx).await;
    Ok(())
}

fn print_tree(items: &[ItemConfig], depth: usize) {
    for item in items {
        let mut line = format!("{}{} ({})", "  ".repeat(depth), item.id, item.label());
        if item.disabled {
            line.push_str(" [disabled]");
        }
        if !item.selectable {
            line.push_str(" [not selectable]");
        }
        if let Some(include) = &item.include {
            line.push_str(&format!(" -> {}", include.display()));
        }
        println!("{}", line);
        print_tree(&item.children, depth + 1);
    }
}
