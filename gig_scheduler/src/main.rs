use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use gig_players::{
    clients::{FileClient, IClient},
    RosterSheet,
};
use gig_rs::{
    store::{MemoryAvailability, MemoryDirectory, MemoryEvents},
    workspace::BandWorkspace,
    DateKey,
};
use gig_scheduler::{
    inline_sheet, parse_availability, parse_members, parse_month, render_bookable_dates,
    render_calendar,
};

/// バンドの参加可能日を集計する
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// name,property_name,value 形式の csv
    #[arg(long = "roster", global = true)]
    roster: Option<PathBuf>,

    #[arg(long = "band", global = true, default_value = "Band")]
    band: String,

    /// ex. --primary name/guitar/vocal
    #[arg(short = 'p', long = "primary", global = true)]
    primary_members: Vec<String>,

    /// ex. --substitute name/bass
    #[arg(short = 's', long = "substitute", global = true)]
    substitutes: Vec<String>,

    /// ex. --available name/2024-05-01/2024-05-02
    #[arg(short = 'a', long = "available", global = true)]
    availability: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 月ごとの集計結果
    Calendar {
        /// ex. --month 2024-05
        #[arg(long)]
        month: String,
    },

    /// 予定を入れられる日
    Dates {
        /// ex. --today 2024-05-01 (省略時は今日)
        #[arg(long)]
        today: Option<String>,
    },
}

fn load_sheet(args: &Args) -> Result<RosterSheet, Box<dyn std::error::Error>> {
    if let Some(path) = &args.roster {
        let data = FileClient::new(path).fetch()?;
        let sheet = RosterSheet::from_csv(&args.band, &data)?;
        return Ok(sheet);
    }

    let primary_members = parse_members(&args.primary_members)?;
    let substitutes = parse_members(&args.substitutes)?;
    let availability = parse_availability(&args.availability)?;
    let sheet = inline_sheet(&args.band, &primary_members, &substitutes, &availability)?;
    Ok(sheet)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let sheet = load_sheet(&args)?;

    let directory = Arc::new(MemoryDirectory::new());
    let availability = Arc::new(MemoryAvailability::new());
    sheet.load_into(&*directory, &*availability)?;
    let workspace = BandWorkspace::new(directory, availability, Arc::new(MemoryEvents::new()));

    let band = workspace.band(&sheet.band.id)?;
    let names = workspace.member_names(&band)?;
    let output = match &args.command {
        Command::Calendar { month } => {
            let (year, month) = parse_month(month)?;
            let calendar = workspace.month_calendar(&band.id, year, month)?;
            render_calendar(&calendar, &band.roster, &names)
        }
        Command::Dates { today } => {
            let today = match today {
                Some(today) => DateKey::parse(today)?,
                None => DateKey::from(chrono::Local::now().date_naive()),
            };
            let bookable_dates = workspace.bookable_dates(&band.id, today)?;
            render_bookable_dates(&bookable_dates, &band.roster, &names)
        }
    };

    print!("{}", output);
    Ok(())
}

// ex. gig_scheduler calendar --month 2024-05 --primary ana/guitar --primary beto/bass --substitute cora/bass --available ana/2024-05-01
// ex. gig_scheduler dates --roster members.csv --band "Los Gatos"
fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(error) = run(args) {
        log::error!("{}", error);
        eprintln!("error: {}", error);
        std::process::exit(1);
    }
}
