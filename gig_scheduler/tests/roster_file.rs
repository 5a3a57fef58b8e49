use std::{io::Write, sync::Arc};

use gig_players::{
    clients::{FileClient, IClient},
    RosterSheet,
};
use gig_rs::{
    store::{MemoryAvailability, MemoryDirectory, MemoryEvents},
    workspace::BandWorkspace,
    DateKey,
};
use gig_scheduler::{render_bookable_dates, render_calendar};

const DATA: &str = "name,property_name,value
ana,instrument,guitar
ana,available,2024-05-01
ana,available,2024-05-02
beto,instrument,bass
beto,available,2024-05-02
cora,instrument,bass
cora,role,substitute
cora,available,2024-05-01
";

fn load_workspace() -> (
    RosterSheet,
    BandWorkspace<MemoryDirectory, MemoryAvailability, MemoryEvents>,
) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(DATA.as_bytes()).unwrap();

    let data = FileClient::new(file.path()).fetch().unwrap();
    let sheet = RosterSheet::from_csv("Los Gatos", &data).unwrap();

    let directory = Arc::new(MemoryDirectory::new());
    let availability = Arc::new(MemoryAvailability::new());
    sheet.load_into(&*directory, &*availability).unwrap();
    let workspace = BandWorkspace::new(directory, availability, Arc::new(MemoryEvents::new()));
    (sheet, workspace)
}

#[test]
fn calendar_from_file() {
    let (sheet, workspace) = load_workspace();
    let names = workspace.member_names(&sheet.band).unwrap();
    let calendar = workspace.month_calendar(&sheet.band.id, 2024, 5).unwrap();

    let output = render_calendar(&calendar, &sheet.band.roster, &names);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "2024-05");
    assert_eq!(lines[1], "01/05/2024 ✓ ana, cora*");
    assert_eq!(lines[2], "02/05/2024 ✓ ana, beto");
    assert_eq!(lines[3], "03/05/2024 ✗");

    // 見出し + 31 日
    assert_eq!(lines.len(), 32);
}

#[test]
fn bookable_dates_from_file() {
    let (sheet, workspace) = load_workspace();
    let names = workspace.member_names(&sheet.band).unwrap();
    let today = DateKey::parse("2024-05-02").unwrap();
    let bookable_dates = workspace.bookable_dates(&sheet.band.id, today).unwrap();

    let output = render_bookable_dates(&bookable_dates, &sheet.band.roster, &names);
    assert_eq!(output, "02/05/2024 ana, beto\n");
}

#[test]
fn missing_file() {
    let directory = tempfile::tempdir().unwrap();
    let result = FileClient::new(directory.path().join("missing.csv")).fetch();
    assert!(result.is_err());
}
