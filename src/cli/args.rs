//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Open Graph, Twitter Card and schema.org head tags for published content
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: shareable.toml)
    #[arg(short = 'C', long, global = true, default_value = "shareable.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Content fixture path (overrides `content` in the config)
    #[arg(short, long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub content: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print the head block for a request path
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        request: RequestArgs,

        /// Response status the page is served with
        #[arg(long, default_value_t = 200)]
        status: u16,

        /// Document title the host already computed
        #[arg(long)]
        title: Option<String>,

        /// Separator the host used in its document title
        #[arg(long)]
        separator: Option<String>,
    },

    /// Print the <html> element attributes for a request path
    #[command(visible_alias = "a")]
    Attrs {
        #[command(flatten)]
        request: RequestArgs,

        /// Attributes already on the element, e.g. 'lang="en-US"'
        #[arg(long, default_value = "")]
        existing: String,
    },

    /// Record a content change, invalidating cached output
    #[command(visible_alias = "t")]
    Touch {
        /// Kind of change
        #[arg(short, long, value_enum, default_value_t = EventArg::SavePost)]
        event: EventArg,

        /// Option name for `updated_option`
        #[arg(long)]
        option: Option<String>,
    },

    /// Manage cached output
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Request inputs shared by `render` and `attrs`.
#[derive(clap::Args, Debug, Clone)]
pub struct RequestArgs {
    /// Request path plus optional query, e.g. `/hello/` or `/?s=term`
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Host the request was made to
    #[arg(long, default_value = "localhost")]
    pub host: String,

    /// Request was made over HTTPS
    #[arg(long)]
    pub https: bool,

    /// User-Agent header
    #[arg(short = 'A', long, default_value = "")]
    pub user_agent: String,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheAction {
    /// Remove every cached entry
    Clear,
}

/// Content change events.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[value(rename_all = "snake_case")]
pub enum EventArg {
    SavePost,
    EditTerms,
    ProfileUpdate,
    UpdatedOption,
}

impl EventArg {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SavePost => "save_post",
            Self::EditTerms => "edit_terms",
            Self::ProfileUpdate => "profile_update",
            Self::UpdatedOption => "updated_option",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render() {
        let cli = Cli::try_parse_from([
            "shareable", "-v", "render", "/hello/", "--https", "-A", "Twitterbot/1.0", "--status", "404",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Render { request, status, .. } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(request.path, "/hello/");
        assert!(request.https);
        assert_eq!(request.user_agent, "Twitterbot/1.0");
        assert_eq!(status, 404);
    }

    #[test]
    fn test_parse_touch_and_cache() {
        let cli = Cli::try_parse_from(["shareable", "touch", "--event", "edit_terms"]).unwrap();
        assert!(matches!(cli.command, Commands::Touch { event: EventArg::EditTerms, .. }));

        let cli = Cli::try_parse_from(["shareable", "cache", "clear"]).unwrap();
        assert!(matches!(cli.command, Commands::Cache { action: CacheAction::Clear }));
    }
}
