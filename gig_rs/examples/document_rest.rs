use std::sync::Arc;

use clap::Parser;
use futures::future::join_all;
use gig_rs::{
    algorithm::{AvailabilityAggregator, MonthCalendar},
    http::DocumentClient,
    BandId, Member,
};
use tokio::task::JoinHandle;

/// ドキュメントストアからバンドを読み込んで参加可否を表示する
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// ex --base-url http://domain.com/api
    #[arg(long = "base-url", required = true)]
    base_url: String,

    /// ex. --band los-gatos
    #[arg(long = "band", required = true)]
    band: String,

    /// ex. --month 2024-05
    #[arg(long = "month", required = false)]
    month: Option<String>,
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let client = Arc::new(DocumentClient::parse(&args.base_url)?);
    let band = client.fetch_band(&BandId::from(args.band.as_str())).await?;

    // メンバー
    let member_request_join_handles: Vec<JoinHandle<gig_rs::Result<Member>>> = band
        .roster
        .member_ids()
        .cloned()
        .map(|x| {
            tokio::spawn({
                let local = client.clone();
                async move { local.fetch_member(&x).await }
            })
        })
        .collect();

    let table = client.fetch_availability_table(&band).await?;
    let availability = AvailabilityAggregator::aggregate_roster(&band.roster, &table)?;

    // メンバーの出力
    for member in join_all(member_request_join_handles).await {
        let member = member??;
        let role = band.roster.role_of(&member.id);
        println!("id={}, name={}, role={:?}", member.id, member.name, role);
    }

    // 参加可否の出力
    match args.month {
        Some(month) => {
            let invalid = || gig_rs::Error::InvalidDateKey(month.clone());
            let (year, month_of_year) = month.split_once('-').ok_or_else(invalid)?;
            let year: i32 = year.parse().map_err(|_| invalid())?;
            let month: u32 = month_of_year.parse().map_err(|_| invalid())?;
            let calendar = MonthCalendar::new(year, month, &availability)?;
            for day in calendar.days() {
                println!("{} {}", day.date, if day.is_available() { "o" } else { "x" });
            }
        }
        None => {
            for coverage in availability.iter() {
                println!("{} available={}", coverage.date, coverage.is_available);
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(error) = run().await {
        log::error!("{error}");
        std::process::exit(1);
    }
}
