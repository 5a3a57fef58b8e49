use gig_players::{clients::IClient, RosterSheet};

fn main() {
    env_logger::init();

    let data = gig_players::clients::SampleClient::default()
        .fetch()
        .unwrap();
    let sheet = RosterSheet::from_csv("Sample", &data).unwrap();
    for member in &sheet.members {
        println!("{:?} {:?}", member, sheet.band.roster.role_of(&member.id));
    }
}
