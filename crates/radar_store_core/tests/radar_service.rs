use radar_store_core::db::open_db_in_memory;
use radar_store_core::{Radar, RadarRepository, RadarService, SqliteRadarRepository};

#[test]
fn loaded_rows_start_unmodified_and_only_changed_rows_are_saved() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRadarRepository::try_new(&conn).unwrap();
    repo.save_radars(&[
        Radar::new("left", "10.0.0.1", 4001),
        Radar::new("right", "10.0.0.2", 4002),
    ])
    .unwrap();
    let service = RadarService::new(repo);

    let mut loaded = service.load_radars(0).unwrap();
    assert_eq!(loaded.len(), 2);
    assert!(loaded.iter().all(|record| !record.is_changed()));

    loaded[1].edit().radar.remark = "edited".to_string();
    assert!(service.save_changed(&loaded).unwrap());

    let reloaded = service.repository().list_all_by_id().unwrap();
    assert_eq!(reloaded[0].radar.remark, "");
    assert_eq!(reloaded[1].radar.remark, "edited");
}

#[test]
fn unchanged_rows_produce_a_noop_save() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRadarRepository::try_new(&conn).unwrap();
    repo.save_radar(&Radar::new("only", "10.0.0.1", 4001))
        .unwrap();
    let service = RadarService::new(repo);

    let loaded = service.load_radars(0).unwrap();
    assert!(service.save_changed(&loaded).unwrap());
    let labels = service.load_label_names().unwrap();
    assert!(service.save_changed_label_names(&labels).unwrap());
}

#[test]
fn changed_label_names_are_written_back() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRadarRepository::try_new(&conn).unwrap();
    repo.save_radars(&[
        Radar::new("first", "10.0.0.1", 4001),
        Radar::new("second", "10.0.0.2", 4002),
    ])
    .unwrap();
    let service = RadarService::new(repo);

    let mut labels = service.load_label_names().unwrap();
    assert_eq!(labels.len(), 2);
    assert!(labels.iter().all(|row| !row.is_changed()));
    labels[1].edit().item_name_radar_state = "radar_2_state".to_string();
    labels[1].edit().item_name_collision_state_2 = "radar_2_collision".to_string();
    assert!(service.save_changed_label_names(&labels).unwrap());

    let reloaded = service.load_label_names().unwrap();
    assert!(!reloaded[1].is_changed());
    assert_eq!(reloaded[0].get().item_name_radar_state, "");
    assert_eq!(reloaded[1].get().item_name_radar_state, "radar_2_state");
    assert_eq!(
        reloaded[1].get().item_name_collision_state_2,
        "radar_2_collision"
    );
    assert_eq!(reloaded[1].get().address, "10.0.0.2:4002");

    let radars = service.repository().list_all_by_id().unwrap();
    assert_eq!(radars[1].radar.name, "second");
    assert_eq!(service.delete_radar(reloaded[1].get().id.get()).unwrap(), 1);
}
