//! Command-line definition.

use clap::{Arg, ArgAction, Command, value_parser};

pub fn build_cli() -> Command {
    Command::new("gtracker")
        .about("Record litter reports with a photo and location, and track their cleanup")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .env("GTRACKER_DATA_DIR")
                .default_value(".gtracker")
                .help("Directory holding config.toml and the report database"),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("add")
                .about("Submit a new report")
                .arg(
                    Arg::new("image")
                        .long("image")
                        .required(true)
                        .help("Photo of the litter (png, jpg, gif)"),
                )
                .arg(coordinate("lat", "Latitude of the litter"))
                .arg(coordinate("lon", "Longitude of the litter"))
                .arg(
                    Arg::new("description")
                        .long("description")
                        .short('d')
                        .help("What was found"),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List reports, newest first")
                .arg(
                    Arg::new("status")
                        .long("status")
                        .help("Only show reports with this status"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print reports as JSON, images included"),
                ),
        )
        .subcommand(
            Command::new("status")
                .about("Change the status of a report")
                .arg(Arg::new("id").required(true))
                .arg(
                    Arg::new("status")
                        .required(true)
                        .help("reported, in-progress or resolved"),
                ),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a report")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(Command::new("stats").about("Count reports by status"))
        .subcommand(
            Command::new("map")
                .about("Print a map link for a report")
                .arg(Arg::new("id").required(true)),
        )
        .subcommand(
            Command::new("route")
                .about("Print route links from a location to a report")
                .arg(Arg::new("id").required(true))
                .arg(coordinate("from-lat", "Latitude to start from"))
                .arg(coordinate("from-lon", "Longitude to start from")),
        )
        .subcommand(Command::new("config").about("Print the effective configuration"))
}

fn coordinate(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .required(true)
        .allow_negative_numbers(true)
        .value_parser(value_parser!(f64))
        .help(help)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_add_parses_negative_coordinates() {
        let matches = build_cli()
            .try_get_matches_from([
                "gtracker", "add", "--image", "a.png", "--lat", "-33.86", "--lon", "151.2",
            ])
            .unwrap();
        let (name, add) = matches.subcommand().unwrap();
        assert_eq!(name, "add");
        assert_eq!(add.get_one::<f64>("lat"), Some(&-33.86));
        assert_eq!(add.get_one::<String>("description"), None);
    }

    #[test]
    fn test_data_dir_is_global() {
        let matches = build_cli()
            .try_get_matches_from(["gtracker", "stats", "--data-dir", "/tmp/reports"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("data-dir").map(String::as_str),
            Some("/tmp/reports")
        );
    }
}
