//! Command-line admin console for a remote election API.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, LevelFilter};

use election_admin::{
    logging,
    model::{
        api::{ballot::Vote, election::ElectionSpec},
        common::election::{Candidate, ElectionId},
    },
    session::{AdminSession, FileSessionStore},
    view::{Severity, StatusBanner, TerminalView, View},
    Bootstrapper, Config, ElectionApi, Error, HttpApi,
};

const PROGRAM_NAME: &str = "election-admin";

const ABOUT_TEXT: &str = "Administer elections on a remote election API.

The admin key is remembered for the session once the API accepts it, and
checked again every time the program starts.

EXIT CODES:
     0: Success.
     1: Error.";

const CONFIG: &str = "CONFIG";
const KEY: &str = "KEY";
const VERBOSE: &str = "VERBOSE";
const ELECTION_ID: &str = "ELECTION_ID";
const TITLE: &str = "TITLE";
const START: &str = "START";
const END: &str = "END";
const BUDGET: &str = "BUDGET";
const CANDIDATE: &str = "CANDIDATE";
const NEW_KEY: &str = "NEW_KEY";
const NIN: &str = "NIN";
const SECRET_CODE: &str = "SECRET_CODE";

const LOGIN: &str = "login";
const LOGOUT: &str = "logout";
const ELECTIONS: &str = "elections";
const CREATE_ELECTION: &str = "create-election";
const ADD_CANDIDATE: &str = "add-candidate";
const CHANGE_ADMIN: &str = "change-admin";
const CLOSE_ELECTION: &str = "close-election";
const CAST_VOTE: &str = "cast-vote";
const RESULTS: &str = "results";

const CANDIDATE_HELP: &str = "A candidate, as NAME[:PARTY[:ABBREVIATION[:SLOGAN]]]";

type Console = Bootstrapper<HttpApi, FileSessionStore, TerminalView>;

/// Construct the CLI configuration.
fn cli() -> Command {
    // Make the build dirty when the toml changes.
    include_str!("../Cargo.toml");

    let election_id = || {
        Arg::new(ELECTION_ID)
            .help("ID of the election, as shown by `elections`")
            .action(ArgAction::Set)
            .required(true)
    };

    clap::command!(PROGRAM_NAME)
        .about(ABOUT_TEXT)
        .subcommand_required(true)
        .arg(
            Arg::new(CONFIG)
                .help("Configuration file to read instead of ElectionAdmin.toml")
                .long("config")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new(KEY)
                .help("Admin key to authenticate with instead of the remembered one")
                .long("key")
                .short('k')
                .global(true),
        )
        .arg(
            Arg::new(VERBOSE)
                .help("Log diagnostics to stderr")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(Command::new(LOGIN).about("Check an admin key and remember it"))
        .subcommand(Command::new(LOGOUT).about("Forget the remembered admin key"))
        .subcommand(Command::new(ELECTIONS).about("List all elections"))
        .subcommand(
            Command::new(CREATE_ELECTION)
                .about("Create a new election")
                .arg(Arg::new(TITLE).long("title").required(true))
                .arg(
                    Arg::new(START)
                        .help("Start time, RFC 3339")
                        .long("start")
                        .required(true)
                        .value_parser(parse_time),
                )
                .arg(
                    Arg::new(END)
                        .help("End time, RFC 3339")
                        .long("end")
                        .required(true)
                        .value_parser(parse_time),
                )
                .arg(
                    Arg::new(BUDGET)
                        .long("budget")
                        .default_value("0")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new(CANDIDATE)
                        .help(CANDIDATE_HELP)
                        .long("candidate")
                        .action(ArgAction::Append)
                        .value_parser(parse_candidate),
                ),
        )
        .subcommand(
            Command::new(ADD_CANDIDATE)
                .about("Add a candidate to an election")
                .arg(election_id())
                .arg(
                    Arg::new(CANDIDATE)
                        .help(CANDIDATE_HELP)
                        .required(true)
                        .value_parser(parse_candidate),
                ),
        )
        .subcommand(
            Command::new(CHANGE_ADMIN)
                .about("Replace the admin key")
                .arg(Arg::new(NEW_KEY).required(true)),
        )
        .subcommand(
            Command::new(CLOSE_ELECTION)
                .about("Close an election")
                .arg(election_id()),
        )
        .subcommand(
            Command::new(CAST_VOTE)
                .about("Cast a vote on behalf of a voter")
                .arg(election_id())
                .arg(Arg::new(NIN).help("Voter's national ID number").long("nin").required(true))
                .arg(
                    Arg::new(SECRET_CODE)
                        .help("Voter's secret code")
                        .long("secret-code")
                        .required(true),
                )
                .arg(Arg::new(CANDIDATE).long("candidate").required(true)),
        )
        .subcommand(
            Command::new(RESULTS)
                .about("Show the results of an election")
                .arg(election_id()),
        )
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 time such as 2026-10-01T09:00:00Z: {e}"))
}

fn parse_candidate(value: &str) -> Result<Candidate, String> {
    let mut parts = value.splitn(4, ':').map(str::trim);
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err("candidate name must not be empty".to_string());
    }
    let mut next = || parts.next().unwrap_or_default().to_string();
    Ok(Candidate {
        name: name.to_string(),
        party: next(),
        abbreviation: next(),
        slogan: next(),
    })
}

/// Why a command failed.
enum Failure {
    /// The console already told the user.
    Shown,
    Error(Error),
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        Self::Error(err)
    }
}

/// Authenticate with `--key` if given, otherwise with the remembered key.
async fn start(console: &Console, key: Option<&String>) -> Result<Option<AdminSession>, Failure> {
    let outcome = match key {
        Some(key) => {
            console.view().set_credential_input(key);
            console.authenticate().await.map(Some)
        }
        None => console.restore_and_validate().await,
    };
    outcome.map_err(|err| {
        // The bootstrapper has already shown a banner for this.
        debug!("Start-up authentication failed: {err}");
        Failure::Shown
    })
}

/// Like [`start`], for commands that work without an admin session.
async fn revalidate(console: &Console, key: Option<&String>) {
    match start(console, key).await {
        Ok(Some(_)) => debug!("Admin session is valid"),
        Ok(None) => debug!("No admin session"),
        Err(_) => debug!("Admin key check failed, continuing without a session"),
    }
}

/// Like [`start`], but an admin session is required.
async fn admin_session(console: &Console, key: Option<&String>) -> Result<AdminSession, Failure> {
    start(console, key)
        .await?
        .ok_or(Failure::Error(Error::Unauthenticated))
}

fn election_id(args: &ArgMatches) -> ElectionId {
    // Required argument is guaranteed to be present.
    args.get_one::<String>(ELECTION_ID).unwrap().as_str().into()
}

fn success(console: &Console, message: impl Into<String>) {
    console
        .view()
        .show_status(&StatusBanner::new(Severity::Success, message));
}

/// Run one subcommand.
async fn dispatch(
    console: &Console,
    key: Option<&String>,
    command: &str,
    args: &ArgMatches,
) -> Result<(), Failure> {
    match command {
        LOGIN => {
            console.view().set_listing(true);
            if start(console, key).await?.is_none() {
                // Nothing remembered and nothing given: let the bootstrapper complain.
                console.authenticate().await.map_err(|_| Failure::Shown)?;
            }
        }
        LOGOUT => {
            console.logout()?;
        }
        ELECTIONS => {
            console.view().set_listing(true);
            admin_session(console, key).await?;
        }
        CREATE_ELECTION => {
            let session = admin_session(console, key).await?;
            let spec = ElectionSpec {
                title: args.get_one::<String>(TITLE).unwrap().clone(),
                start_time: *args.get_one::<DateTime<Utc>>(START).unwrap(),
                end_time: *args.get_one::<DateTime<Utc>>(END).unwrap(),
                budget: *args.get_one::<f64>(BUDGET).unwrap(),
                candidates: args
                    .get_many::<Candidate>(CANDIDATE)
                    .map(|candidates| candidates.cloned().collect())
                    .unwrap_or_default(),
            };
            match console.api().create_election(&session, &spec).await? {
                Some(id) => success(console, format!("Election created with ID {id}")),
                None => success(console, "Election created"),
            }
            console.view().set_listing(true);
            console.refresh_elections().await?;
        }
        ADD_CANDIDATE => {
            let session = admin_session(console, key).await?;
            let candidate = args.get_one::<Candidate>(CANDIDATE).unwrap();
            console
                .api()
                .add_candidate(&session, &election_id(args), candidate)
                .await?;
            success(console, format!("Candidate {candidate} added"));
        }
        CHANGE_ADMIN => {
            admin_session(console, key).await?;
            console
                .change_admin(args.get_one::<String>(NEW_KEY).unwrap())
                .await?;
            success(console, "Admin key changed");
        }
        CLOSE_ELECTION => {
            let session = admin_session(console, key).await?;
            let id = election_id(args);
            console.api().close_election(&session, &id).await?;
            success(console, format!("Election {id} closed"));
            console.view().set_listing(true);
            console.refresh_elections().await?;
        }
        CAST_VOTE => {
            // Voting needs no admin session, but a remembered key is still checked.
            revalidate(console, key).await;
            let vote = Vote {
                election_id: election_id(args),
                nin: args.get_one::<String>(NIN).unwrap().clone(),
                secret_code: args.get_one::<String>(SECRET_CODE).unwrap().clone(),
                candidate: args.get_one::<String>(CANDIDATE).unwrap().clone(),
            };
            console.api().cast_vote(&vote).await?;
            success(console, format!("Vote cast for {}", vote.candidate));
        }
        RESULTS => {
            revalidate(console, key).await;
            let results = console.api().election_results(&election_id(args)).await?;
            let view = console.view();
            view.line(results.election.as_deref().unwrap_or("Results"));
            for tally in results.standings() {
                view.line(format_args!("  {tally}"));
            }
        }
        _ => unreachable!("clap only accepts known subcommands"),
    }
    Ok(())
}

/// Run the program and return the exit code.
async fn run(args: &ArgMatches) -> u8 {
    let config = match Config::load(args.get_one::<PathBuf>(CONFIG).map(PathBuf::as_path)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return 1;
        }
    };
    let api = match HttpApi::new(&config) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Failed to set up HTTP client: {e}");
            return 1;
        }
    };
    let console = Bootstrapper::new(
        api,
        FileSessionStore::new(config.session_dir()),
        TerminalView::stdout(),
    );

    // Required subcommand is guaranteed to be present.
    let (command, sub_args) = args.subcommand().unwrap();
    match dispatch(&console, args.get_one::<String>(KEY), command, sub_args).await {
        Ok(()) => 0,
        Err(Failure::Shown) => 1,
        Err(Failure::Error(err)) => {
            console
                .view()
                .show_status(&StatusBanner::new(err.severity(), err.to_string()));
            1
        }
    }
}

#[tokio::main]
async fn main() {
    let args = cli().get_matches();

    let level = if args.get_flag(VERBOSE) {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    if let Err(e) = logging::init(level) {
        eprintln!("Failed to initialise logging: {e}");
    }

    let exit_code = run(&args).await;
    std::process::exit(exit_code.into())
}
