use std::sync::Arc;

use gig_rs::{
    algorithm::EventDraft,
    store::{IDirectoryStore, MemoryAvailability, MemoryDirectory, MemoryEvents},
    workspace::BandWorkspace,
    DateKey, Error, Instrument, InstrumentId, MemberId, Role,
};

type Workspace = BandWorkspace<MemoryDirectory, MemoryAvailability, MemoryEvents>;

fn create_workspace() -> Workspace {
    let directory = MemoryDirectory::with_catalog(vec![
        Instrument::new("guitar", "Guitarra", "Cuerdas"),
        Instrument::new("bass", "Bajo", "Cuerdas"),
        Instrument::new("drums", "Batería", "Percusión"),
    ]);
    BandWorkspace::new(
        Arc::new(directory),
        Arc::new(MemoryAvailability::new()),
        Arc::new(MemoryEvents::new()),
    )
}

fn instruments(values: &[&str]) -> Vec<InstrumentId> {
    values.iter().map(|x| InstrumentId::from(*x)).collect()
}

fn date(value: &str) -> DateKey {
    DateKey::parse(value).unwrap()
}

#[test]
fn add_member_reuses_same_name() {
    let workspace = create_workspace();
    let band_a = workspace.create_band("Los Gatos").unwrap();
    let band_b = workspace.create_band("Las Ratas").unwrap();

    let ana = workspace
        .add_member(&band_a.id, "Ana", instruments(&["guitar"]), Role::Primary)
        .unwrap();
    let same = workspace
        .add_member(&band_b.id, " ana ", instruments(&["bass"]), Role::Substitute)
        .unwrap();
    assert_eq!(ana.id, same.id);

    // バンドごとに担当楽器が違ってもよい
    let band_b = workspace.band(&band_b.id).unwrap();
    let entry = band_b.roster.entry(&ana.id).unwrap();
    assert_eq!(entry.role, Role::Substitute);
    assert!(entry.instrument_ids.contains(&InstrumentId::from("bass")));
    assert_eq!(workspace.directory().fetch_members().unwrap().len(), 1);
}

#[test]
fn add_member_validation() {
    let workspace = create_workspace();
    let band = workspace.create_band("Los Gatos").unwrap();

    let result = workspace.add_member(&band.id, "  ", instruments(&["guitar"]), Role::Primary);
    assert!(matches!(result, Err(Error::InvalidMember(_))));

    let result = workspace.add_member(&band.id, "Ana", Vec::new(), Role::Primary);
    assert!(matches!(result, Err(Error::InvalidMember(_))));

    assert!(matches!(
        workspace.create_band(" "),
        Err(Error::InvalidBand(_))
    ));
}

#[test]
fn edit_member_moves_between_roles() {
    let workspace = create_workspace();
    let band = workspace.create_band("Los Gatos").unwrap();
    let ana = workspace
        .add_member(&band.id, "Ana", instruments(&["guitar"]), Role::Primary)
        .unwrap();

    let edited = workspace
        .edit_member(
            &band.id,
            &ana.id,
            "Ana María",
            instruments(&["guitar", "bass"]),
            Role::Substitute,
        )
        .unwrap();
    assert_eq!(edited.name, "Ana María");

    let band = workspace.band(&band.id).unwrap();
    assert_eq!(band.roster.len(), 1);
    assert_eq!(band.roster.role_of(&ana.id), Some(Role::Substitute));

    let views = workspace.roster_view(&band.id).unwrap();
    assert_eq!(views[0].name, "Ana María");
    assert_eq!(views[0].instrument_names, vec!["Bajo", "Guitarra"]);
}

#[test]
fn edit_member_rejects_name_collision() {
    let workspace = create_workspace();
    let band = workspace.create_band("Los Gatos").unwrap();
    workspace
        .add_member(&band.id, "Ana", instruments(&["guitar"]), Role::Primary)
        .unwrap();
    let beto = workspace
        .add_member(&band.id, "Beto", instruments(&["bass"]), Role::Primary)
        .unwrap();

    let result = workspace.edit_member(
        &band.id,
        &beto.id,
        "ANA",
        instruments(&["bass"]),
        Role::Primary,
    );
    assert!(matches!(result, Err(Error::InvalidMember(_))));
}

#[test]
fn remove_member_keeps_member_record() {
    let workspace = create_workspace();
    let band = workspace.create_band("Los Gatos").unwrap();
    let ana = workspace
        .add_member(&band.id, "Ana", instruments(&["guitar"]), Role::Primary)
        .unwrap();

    workspace.remove_member(&band.id, &ana.id).unwrap();
    assert!(workspace.band(&band.id).unwrap().roster.is_empty());
    assert!(workspace.directory().fetch_member(&ana.id).is_ok());

    assert!(matches!(
        workspace.remove_member(&band.id, &ana.id),
        Err(Error::NotOnRoster(_))
    ));
}

#[test]
fn toggle_availability() {
    let workspace = create_workspace();
    let ana = MemberId::from("ana");

    assert!(workspace
        .toggle_availability(&ana, date("2024-05-01"))
        .unwrap());
    assert!(!workspace
        .toggle_availability(&ana, date("2024-05-01"))
        .unwrap());
}

#[test]
fn calendar_and_events() {
    let workspace = create_workspace();
    let band = workspace.create_band("Los Gatos").unwrap();
    let ana = workspace
        .add_member(&band.id, "Ana", instruments(&["guitar"]), Role::Primary)
        .unwrap();
    let beto = workspace
        .add_member(&band.id, "Beto", instruments(&["bass"]), Role::Primary)
        .unwrap();
    let cora = workspace
        .add_member(&band.id, "Cora", instruments(&["bass"]), Role::Substitute)
        .unwrap();

    for value in ["2024-05-01", "2024-05-02"] {
        workspace.toggle_availability(&ana.id, date(value)).unwrap();
    }
    workspace
        .toggle_availability(&beto.id, date("2024-05-02"))
        .unwrap();
    workspace
        .toggle_availability(&cora.id, date("2024-05-01"))
        .unwrap();

    let calendar = workspace.month_calendar(&band.id, 2024, 5).unwrap();
    let available: Vec<u32> = calendar
        .days()
        .iter()
        .filter(|x| x.is_available())
        .map(|x| x.date.day())
        .collect();
    assert_eq!(available, vec![1, 2]);

    let today = date("2024-05-01");
    let event = workspace
        .create_event(
            &band.id,
            EventDraft {
                date: Some(date("2024-05-01")),
                title: "Ensayo".to_string(),
                ..Default::default()
            },
            today,
        )
        .unwrap();
    assert_eq!(event.members, vec![ana.id.clone(), cora.id.clone()]);

    // 予定の入った日付はもう選べない
    let bookable = workspace.bookable_dates(&band.id, today).unwrap();
    assert_eq!(bookable.len(), 1);
    let result = workspace.create_event(
        &band.id,
        EventDraft {
            date: Some(date("2024-05-01")),
            title: "Concierto".to_string(),
            ..Default::default()
        },
        today,
    );
    assert!(matches!(result, Err(Error::DateNotBookable(_))));

    // 予定のスナップショットは参加可能日が変わっても変わらない
    workspace
        .toggle_availability(&cora.id, date("2024-05-01"))
        .unwrap();
    let events = workspace.events(&band.id).unwrap();
    assert_eq!(events[0].members, vec![ana.id.clone(), cora.id.clone()]);

    // 削除すると現在の参加可能日から再計算される (cora が抜けたので候補に戻らない)
    workspace.delete_event(&band.id, &event.id).unwrap();
    let bookable = workspace.bookable_dates(&band.id, today).unwrap();
    let dates: Vec<String> = bookable.iter().map(|x| x.date.to_string()).collect();
    assert_eq!(dates, vec!["2024-05-02"]);

    assert!(matches!(
        workspace.delete_event(&band.id, &event.id),
        Err(Error::EventNotFound(_))
    ));
}
