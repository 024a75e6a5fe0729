use epic_timeline::model::epic::EpicUpdate;
use epic_timeline::repo::RepoResult;
use epic_timeline::{
    EpicStatus, Error, ImportError, ImportMode, JsonFileRepository, MemoryRepository, Planner,
    ProjectList, ProjectRepository, ProjectUpdate, RangeError, RepoError,
};

const IMPORT: &str = r#"{
    "id": "proj-1",
    "project_name": "Plataforma SaaS",
    "total_estimated_hours": 1200,
    "total_consumed_hours": 600,
    "current_phase": "Desarrollo Módulo A",
    "start_month": "enero 2024",
    "months_to_display": 6,
    "epics": [
        {"name": "Planificación", "startDate": "2 de enero 2024", "endDate": "31 de enero 2024", "status": "Completada"},
        {"name": "Diseño", "startDate": "1 de febrero 2024", "endDate": "29 de febrero 2024", "status": "En Progreso", "tagIds": ["t-ux"]},
        {"name": "Desarrollo", "startDate": "1 de marzo 2024", "endDate": "30 de junio 2024", "status": "No Iniciada"}
    ],
    "tags": [{"id": "t-ux", "name": "UX", "color": "pink"}]
}"#;

fn names<R: ProjectRepository>(planner: &Planner<R>) -> Vec<String> {
    planner
        .selected()
        .unwrap()
        .epics
        .iter()
        .map(|e| e.name.clone())
        .collect()
}

#[test]
fn file_repository_persists_every_change() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::in_dir(dir.path());

    let mut planner = Planner::new(repo).unwrap();
    assert!(planner.projects().is_empty());
    let id = planner.import_project(IMPORT, ImportMode::AsNew).unwrap();
    assert_eq!(id, "proj-1");
    planner.reorder_epics(2, 0).unwrap();

    let reopened = Planner::new(JsonFileRepository::in_dir(dir.path())).unwrap();
    assert_eq!(names(&reopened), ["Desarrollo", "Planificación", "Diseño"]);
    let project = reopened.selected().unwrap();
    assert_eq!(project.epics.iter().map(|e| e.order).collect::<Vec<_>>(), [0, 1, 2]);
    assert_eq!(project.progress_status, 67);
    assert_eq!(project.remaining_hours(), 600.0);
}

#[test]
fn draft_edits_are_validated_before_commit() {
    let mut planner = Planner::new(MemoryRepository::new()).unwrap();
    planner.import_project(IMPORT, ImportMode::AsNew).unwrap();
    let target = planner.selected().unwrap().epics[1].id;

    let mut draft = planner.edit_epic_draft(target).unwrap();
    let december = epic_timeline::parse_date("15 de diciembre 2023");
    assert_eq!(draft.set_start_date(december), Err(RangeError::OutOfWindow));
    assert!(matches!(
        planner.apply_draft(target, &mut draft),
        Err(Error::Range(RangeError::OutOfWindow))
    ));
    assert_eq!(
        planner.selected().unwrap().epic(target).unwrap().start_date,
        "1 de febrero 2024"
    );

    let april = epic_timeline::parse_date("10 de abril 2024");
    assert!(draft.set_end_date(april).is_ok());
    planner.apply_draft(target, &mut draft).unwrap();
    assert_eq!(
        planner.selected().unwrap().epic(target).unwrap().end_date,
        "10 de abril 2024"
    );
}

#[test]
fn delete_keeps_gaps_until_next_reorder() {
    let mut planner = Planner::new(MemoryRepository::new()).unwrap();
    planner.import_project(IMPORT, ImportMode::AsNew).unwrap();
    let middle = planner.selected().unwrap().epics[1].id;

    planner.delete_epic(middle).unwrap();
    let orders: Vec<u32> = planner.selected().unwrap().epics.iter().map(|e| e.order).collect();
    assert_eq!(orders, [0, 2]);

    planner.reorder_epics(0, 0).unwrap();
    let orders: Vec<u32> = planner.selected().unwrap().epics.iter().map(|e| e.order).collect();
    assert_eq!(orders, [0, 1]);
}

#[test]
fn status_cycle_updates_progress() {
    let mut planner = Planner::new(MemoryRepository::new()).unwrap();
    planner.import_project(IMPORT, ImportMode::AsNew).unwrap();
    let last = planner.selected().unwrap().epics[2].id;
    planner.cycle_epic_status(last).unwrap();
    let project = planner.selected().unwrap();
    assert_eq!(project.epic(last).unwrap().status, EpicStatus::InProgress);
    assert_eq!(project.progress_status, 100);
}

#[test]
fn import_modes_and_rejections() {
    let mut planner = Planner::new(MemoryRepository::new()).unwrap();
    planner.import_project(IMPORT, ImportMode::AsNew).unwrap();
    let copy = planner.import_project(IMPORT, ImportMode::AsNew).unwrap();
    assert_ne!(copy, "proj-1");
    assert_eq!(planner.projects().len(), 2);

    planner.select("proj-1").unwrap();
    let first = planner.selected().unwrap().epics[0].id;
    planner
        .update_epic(
            first,
            &EpicUpdate {
                name: Some("Cambiada".into()),
                ..Default::default()
            },
        )
        .unwrap();
    planner.import_project(IMPORT, ImportMode::Replace).unwrap();
    assert_eq!(planner.projects().len(), 2);
    assert_eq!(names(&planner)[0], "Planificación");

    let err = planner
        .import_project(r#"{"projectName": "x", "epics": []}"#, ImportMode::AsNew)
        .unwrap_err();
    assert!(matches!(err, Error::Import(ImportError::MissingField("id"))));
    assert_eq!(planner.projects().len(), 2);
}

#[test]
fn settings_edit_rejects_empty_window() {
    let mut planner = Planner::new(MemoryRepository::new()).unwrap();
    planner.create_project("Nuevo", "marzo 2025", 3).unwrap();
    let err = planner
        .update_settings(&ProjectUpdate {
            months_to_display: Some(0),
            ..Default::default()
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidWindow(_)));

    planner
        .update_settings(&ProjectUpdate {
            start_month: Some("Abril 2025".into()),
            total_estimated_hours: Some(80.0),
            ..Default::default()
        })
        .unwrap();
    let project = planner.selected().unwrap();
    assert_eq!(project.start_month, "abril 2025");
    assert_eq!(project.months_to_display, 3);
    assert_eq!(project.total_estimated_hours, 80.0);
}

#[test]
fn export_round_trips_through_import() {
    let mut planner = Planner::new(MemoryRepository::new()).unwrap();
    planner.import_project(IMPORT, ImportMode::AsNew).unwrap();
    let json = planner.export_selected().unwrap();
    let again = epic_timeline::io::import_project(&json).unwrap();
    assert_eq!(&again, planner.selected().unwrap());
}

#[test]
fn deleting_a_tag_detaches_it_from_epics() {
    let mut planner = Planner::new(MemoryRepository::new()).unwrap();
    planner.import_project(IMPORT, ImportMode::AsNew).unwrap();
    let backend = planner.add_tag("Backend", "blue").unwrap();
    let target = planner.selected().unwrap().epics[1].id;
    let update = EpicUpdate {
        tag_ids: Some(vec!["t-ux".to_string(), backend.clone()]),
        ..Default::default()
    };
    planner.update_epic(target, &update).unwrap();

    planner.delete_tag(&backend).unwrap();
    let project = planner.selected().unwrap();
    assert_eq!(project.tags.len(), 1);
    assert_eq!(project.epic(target).unwrap().tag_ids, ["t-ux"]);

    planner.delete_tag("t-ux").unwrap();
    let project = planner.selected().unwrap();
    assert!(project.tags.is_empty());
    assert!(project.epics.iter().all(|e| e.tag_ids.is_empty()));
}

/// Loads like the memory repository but refuses to save once `fail` is set.
#[derive(Default)]
struct FlakyRepository {
    inner: MemoryRepository,
    fail: bool,
}

impl ProjectRepository for FlakyRepository {
    fn load(&self) -> RepoResult<ProjectList> {
        self.inner.load()
    }

    fn save(&mut self, list: &ProjectList) -> RepoResult<()> {
        if self.fail {
            return Err(RepoError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )));
        }
        self.inner.save(list)
    }
}

#[test]
fn failed_save_leaves_state_unchanged() {
    let mut planner = Planner::new(FlakyRepository::default()).unwrap();
    let id = planner.import_project(IMPORT, ImportMode::AsNew).unwrap();
    let target = planner.selected().unwrap().epics[0].id;
    let before = planner.selected().unwrap().clone();

    let mut planner = Planner::new(FlakyRepository {
        inner: planner.repository().inner.clone(),
        fail: true,
    })
    .unwrap();

    assert!(matches!(planner.delete_epic(target), Err(Error::Repo(_))));
    assert!(planner.reorder_epics(2, 0).is_err());
    assert!(planner.delete_tag("t-ux").is_err());
    assert_eq!(planner.selected().unwrap(), &before);

    assert!(planner.create_project("Otro", "enero 2024", 3).is_err());
    assert!(planner.import_project(IMPORT, ImportMode::AsNew).is_err());
    assert!(planner.delete_project(&id).is_err());
    assert_eq!(planner.projects().len(), 1);
    assert_eq!(planner.selected().unwrap().id, id);
}

#[test]
fn corrupt_project_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::in_dir(dir.path());
    std::fs::write(repo.path(), "not json").unwrap();

    assert!(matches!(repo.load(), Err(RepoError::Json(_))));
    assert!(matches!(Planner::new(repo), Err(Error::Repo(RepoError::Json(_)))));
    let on_disk = std::fs::read_to_string(dir.path().join("projects.json")).unwrap();
    assert_eq!(on_disk, "not json");
}
