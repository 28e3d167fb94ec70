use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::nutrition::ProfileForm;

#[derive(Parser, Debug)]
#[command(author, version, about = "Find recipes for the ingredients you have and get daily nutrition targets", long_about = None)]
pub struct Cli {
    /// Recipe server base URL (overrides MEAL_MATE_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Where the profile record is stored (overrides MEAL_MATE_PROFILE_PATH)
    #[arg(long, global = true)]
    pub profile_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show autocomplete suggestions for a partial ingredient name
    Suggest {
        query: String,
    },
    /// Search recipes that use the given ingredients
    Search {
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// Manage the stored body profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Print daily nutrition targets for the stored profile
    Targets,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Validate and store a profile, replacing any previous one
    Save(ProfileArgs),
    /// Print the stored profile
    Show,
}

#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// male or female
    #[arg(long)]
    pub gender: String,
    /// Age in years
    #[arg(long)]
    pub age: String,
    /// Weight in pounds
    #[arg(long)]
    pub weight: String,
    /// Height in inches
    #[arg(long)]
    pub height: String,
    /// sedentary, light, moderate, active or extra
    #[arg(long, default_value = "sedentary")]
    pub activity: String,
    /// lose, maintain or gain
    #[arg(long, default_value = "maintain")]
    pub goal: String,
}

impl From<ProfileArgs> for ProfileForm {
    fn from(args: ProfileArgs) -> Self {
        ProfileForm {
            gender: args.gender,
            age: args.age,
            weight: args.weight,
            height: args.height,
            activity: args.activity,
            goal: args.goal,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_profile_save_arguments() {
        let cli = Cli::try_parse_from([
            "meal-mate", "profile", "save", "--gender", "female", "--age", "29", "--weight", "130",
            "--height", "63", "--goal", "lose",
        ])
        .unwrap();
        let Command::Profile(ProfileCommand::Save(args)) = cli.command else {
            panic!("expected profile save");
        };
        let form = ProfileForm::from(args);
        assert_eq!(form.activity, "sedentary");
        assert_eq!(form.goal, "lose");
    }

    #[test]
    fn test_search_needs_ingredients() {
        assert!(Cli::try_parse_from(["meal-mate", "search"]).is_err());
        let cli = Cli::try_parse_from(["meal-mate", "--base-url", "http://x", "search", "Egg", "rice"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://x"));
        assert!(matches!(cli.command, Command::Search { ingredients } if ingredients.len() == 2));
    }
}
