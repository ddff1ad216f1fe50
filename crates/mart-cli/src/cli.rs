use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mart",
    about = "LXP Mart storefront catalog admin and host",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to ./mart.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the product data
    #[arg(long, global = true, env = "MART_DATA_DIR")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Serve the storefront
    Serve(ServeArgs),
    /// List products
    List(ListArgs),
    /// Show one product
    Show(ShowArgs),
    /// Add a product
    Add(AddArgs),
    /// Edit a product
    Update(UpdateArgs),
    /// Delete a product
    Delete(DeleteArgs),
    /// Add every product from a JSON file
    Import(ImportArgs),
    /// Print the catalog as JSON
    Export,
    /// Ask the generative service for a single suggestion
    Suggest(SuggestArgs),
    /// Draft name, description, and price from an image
    Draft(DraftArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,
    /// Directory with the built storefront
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Show ids, as the admin page does
    #[arg(long)]
    pub admin: bool,
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct ShowArgs {
    pub id: String,
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub price: String,
    #[arg(long)]
    pub description: String,
    /// Image file, or a data: URI
    #[arg(long)]
    pub image: String,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub price: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Image file, or a data: URI
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ImportArgs {
    /// JSON array of products; ids in the file are ignored
    pub file: PathBuf,
}

#[derive(Args)]
pub struct SuggestArgs {
    #[command(subcommand)]
    pub what: SuggestCommand,
}

#[derive(Subcommand)]
pub enum SuggestCommand {
    /// Suggest a name from an image
    Name {
        #[arg(long)]
        image: String,
    },
    /// Suggest a description from an image and a name
    Description {
        #[arg(long)]
        image: String,
        #[arg(long)]
        name: String,
    },
    /// Suggest a price from a name and a description
    Price {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
    },
}

#[derive(Args)]
pub struct DraftArgs {
    /// Image file, or a data: URI
    #[arg(long)]
    pub image: String,
    /// Add the drafted product to the catalog
    #[arg(long)]
    pub save: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_add() {
        let cli = Cli::try_parse_from([
            "mart", "add", "--name", "Widget", "--price", "100", "--description", "d", "--image",
            "w.png",
        ])
        .unwrap();
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.name, "Widget");
                assert_eq!(args.price, "100");
            }
            _ => panic!("expected add"),
        }
    }

    #[test]
    fn parses_nested_suggest() {
        let cli = Cli::try_parse_from([
            "mart", "--verbose", "suggest", "price", "--name", "n", "--description", "d",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Suggest(SuggestArgs {
                what: SuggestCommand::Price { .. }
            })
        ));
    }
}
