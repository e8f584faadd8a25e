fn main() {
    println!("Run `cargo test -p pipeline-tests` to execute the end-to-end pipeline tests.");
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use cfgdeploy_file_ops::{Payload, Targets, create_backup, install};
    use cfgdeploy_protocol::{Category, CategorySet, ChannelSink, Event, EventQueue, LogLine, NoopSink};
    use cfgdeploy_session::{BackupPolicy, InstallRequest, Session, run_install_in_background};
    use cfgdeploy_steam::{
        FixedSource, GameLayout, MARKER_EXECUTABLE, Paths, RootSource, detect_root,
        list_libraries, parse_library_paths,
    };
    use tempfile::TempDir;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    fn load_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    /// A Steam root with its game installed in a second library and the
    /// given profiles, each with a per-user cfg directory.
    struct SteamTree {
        _tmp: TempDir,
        root: PathBuf,
        library: PathBuf,
    }

    impl SteamTree {
        fn new(profiles: &[&str]) -> Self {
            let tmp = TempDir::new().unwrap();
            let root = tmp.path().join("Steam");
            let library = tmp.path().join("SteamLibrary");
            let layout = GameLayout::default();
            let paths = Paths::with_base(&root);

            fs::create_dir_all(paths.steamapps_dir()).unwrap();
            fs::write(paths.marker_path(), b"#!/bin/sh").unwrap();
            fs::write(
                paths.library_manifest(),
                format!(
                    "\"libraryfolders\"\n{{\n\t\"0\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n\t\"1\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n}}\n",
                    root.display(),
                    library.display()
                ),
            )
            .unwrap();

            let global = layout.cfg_dir(&library);
            fs::create_dir_all(&global).unwrap();
            fs::write(global.join("config.cfg"), "existing").unwrap();

            for id in profiles {
                let dir = paths.user_cfg_dir(id, &layout);
                fs::create_dir_all(&dir).unwrap();
                fs::write(dir.join("cs2_video.txt"), "existing").unwrap();
            }

            Self {
                _tmp: tmp,
                root,
                library,
            }
        }

        fn sources(&self) -> Vec<Box<dyn RootSource>> {
            vec![
                Box::new(FixedSource::new("unset", "")),
                Box::new(FixedSource::new(
                    "root",
                    self.root.to_string_lossy().into_owned(),
                )),
            ]
        }

        fn global_cfg(&self) -> PathBuf {
            GameLayout::default().cfg_dir(&self.library)
        }

        fn scratch(&self) -> PathBuf {
            let dir = self.root.parent().unwrap().join("payload");
            fs::create_dir_all(&dir).unwrap();
            dir
        }
    }

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        for (name, content) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    fn zip_entries(path: &Path) -> BTreeSet<String> {
        let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    // -----------------------------------------------------------------------
    // Detection
    // -----------------------------------------------------------------------

    #[test]
    fn no_valid_source_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let sources: Vec<Box<dyn RootSource>> = vec![
            Box::new(FixedSource::new("empty", "")),
            Box::new(FixedSource::new(
                "no marker",
                tmp.path().to_string_lossy().into_owned(),
            )),
        ];
        let queue = EventQueue::new();

        assert_eq!(detect_root(&sources, &queue), None);
        let events = queue.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], Event::Log(LogLine::warn("Steam root not found")));
    }

    #[test]
    fn first_valid_source_wins() {
        let steam = SteamTree::new(&[]);
        let other = TempDir::new().unwrap();
        fs::write(other.path().join(MARKER_EXECUTABLE), b"#!").unwrap();

        let mut sources = steam.sources();
        sources.push(Box::new(FixedSource::new(
            "later",
            other.path().to_string_lossy().into_owned(),
        )));

        assert_eq!(detect_root(&sources, &NoopSink), Some(steam.root.clone()));
    }

    #[test]
    fn manifest_fixture_yields_every_path_in_order() {
        let paths = parse_library_paths(&load_fixture("libraryfolders.vdf"));
        assert_eq!(
            paths,
            vec![
                r"C:\Program Files (x86)\Steam",
                r"D:\SteamLibrary",
                r"E:\Games\Steam",
            ]
        );
    }

    #[test]
    fn global_cfg_found_in_second_library() {
        let steam = SteamTree::new(&[]);
        assert_eq!(
            list_libraries(&steam.root),
            vec![steam.root.clone(), steam.library.clone()]
        );

        let mut session = Session::default();
        session.refresh(&steam.sources(), &NoopSink).unwrap();
        assert_eq!(session.global_cfg(), Some(steam.global_cfg().as_path()));
        assert_eq!(
            session.backup_path(Category::Global),
            Some(steam.global_cfg().with_file_name("cfg_backup.zip"))
        );
    }

    // -----------------------------------------------------------------------
    // Profiles
    // -----------------------------------------------------------------------

    #[test]
    fn profile_selection_notifies_once_per_change() {
        let steam = SteamTree::new(&["1001", "1002"]);
        let mut session = Session::default();
        session.refresh(&steam.sources(), &NoopSink).unwrap();
        assert!(session.profile().is_none());

        let queue = EventQueue::new();
        session.select_profile("1001", &queue).unwrap();
        session.select_profile("1001", &queue).unwrap();
        session.select_profile("1002", &queue).unwrap();

        let changes: Vec<Event> = queue.drain().into_iter().filter(Event::is_change).collect();
        let user_changes = changes
            .iter()
            .filter(|e| matches!(e, Event::UserCfgChanged { .. }))
            .count();
        let profile_changes: Vec<&Event> = changes
            .iter()
            .filter(|e| matches!(e, Event::ProfileChanged { .. }))
            .collect();

        assert_eq!(user_changes, 2);
        assert_eq!(
            profile_changes,
            vec![
                &Event::ProfileChanged {
                    profile: Some("1001".into())
                },
                &Event::ProfileChanged {
                    profile: Some("1002".into())
                },
            ]
        );
    }

    // -----------------------------------------------------------------------
    // Backup
    // -----------------------------------------------------------------------

    #[test]
    fn backing_up_twice_yields_same_entries() {
        let steam = SteamTree::new(&[]);
        let cfg = steam.global_cfg();
        fs::create_dir_all(cfg.join("practice")).unwrap();
        fs::write(cfg.join("practice").join("smokes.cfg"), "x").unwrap();

        let first = create_backup(&cfg, Category::Global, &NoopSink).unwrap();
        let first_entries = zip_entries(&first);
        let second = create_backup(&cfg, Category::Global, &NoopSink).unwrap();

        assert_eq!(first, second);
        assert_eq!(zip_entries(&second), first_entries);
        assert!(first_entries.contains("practice/smokes.cfg"));
        assert!(first_entries.contains("config.cfg"));
    }

    #[test]
    fn category_backups_never_collide() {
        let tmp = TempDir::new().unwrap();
        let shared = tmp.path().join("cfg");
        fs::create_dir_all(&shared).unwrap();
        fs::write(shared.join("a.cfg"), "a").unwrap();

        let global = create_backup(&shared, Category::Global, &NoopSink).unwrap();
        let user = create_backup(&shared, Category::PerUser, &NoopSink).unwrap();
        assert_ne!(global, user);
        assert!(global.is_file() && user.is_file());
    }

    // -----------------------------------------------------------------------
    // Install
    // -----------------------------------------------------------------------

    #[test]
    fn archive_install_global_only() {
        let steam = SteamTree::new(&[]);
        let archive = steam.scratch().join("preset.zip");
        write_zip(
            &archive,
            &[("a/b.cfg", "b"), ("c.cfg", "c"), ("readme.txt", "read me")],
        );
        let targets = Targets {
            global_cfg_dir: Some(steam.global_cfg()),
            user_cfg_dir: None,
        };

        let report = install(
            &Payload::Archive(archive),
            CategorySet::new(true, false),
            &targets,
            &NoopSink,
        )
        .unwrap();

        let cfg = steam.global_cfg();
        assert!(cfg.join("a").join("b.cfg").is_file());
        assert!(cfg.join("c.cfg").is_file());
        assert!(!cfg.join("readme.txt").exists());
        assert_eq!(
            (report.total_copied(), report.failed(), report.skipped),
            (2, 0, 1)
        );
    }

    #[test]
    fn file_list_install_both_categories() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global");
        let user = tmp.path().join("user");
        fs::create_dir_all(&global).unwrap();
        fs::create_dir_all(&user).unwrap();
        let x = tmp.path().join("x.cfg");
        let y = tmp.path().join("y.txt");
        fs::write(&x, "x").unwrap();
        fs::write(&y, "y").unwrap();

        let report = install(
            &Payload::FileList(vec![x, y, tmp.path().join("missing.cfg")]),
            CategorySet::new(true, true),
            &Targets {
                global_cfg_dir: Some(global.clone()),
                user_cfg_dir: Some(user.clone()),
            },
            &NoopSink,
        )
        .unwrap();

        assert_eq!(report.global_copied, 1);
        assert_eq!(report.user_copied, 1);
        assert_eq!(report.failed(), 0);
        assert!(global.join("x.cfg").is_file());
        assert!(user.join("y.txt").is_file());
        assert!(!global.join("missing.cfg").exists());
    }

    #[test]
    fn failing_copy_does_not_stop_later_items() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global");
        fs::create_dir_all(global.join("b.cfg")).unwrap();
        let files: Vec<PathBuf> = ["a.cfg", "b.cfg", "c.cfg"]
            .iter()
            .map(|name| {
                let path = tmp.path().join(name);
                fs::write(&path, name).unwrap();
                path
            })
            .collect();
        let queue = EventQueue::new();

        let report = install(
            &Payload::FileList(files),
            CategorySet::new(true, false),
            &Targets {
                global_cfg_dir: Some(global.clone()),
                user_cfg_dir: None,
            },
            &queue,
        )
        .unwrap();

        assert_eq!(report.global_copied, 2);
        assert_eq!(report.failed(), 1);
        assert!(global.join("c.cfg").is_file());

        let last = queue.drain().pop().unwrap();
        assert_eq!(
            last,
            Event::Log(LogLine::warn("Install finished: 2 copied, 1 failed, 0 skipped"))
        );
    }

    // -----------------------------------------------------------------------
    // Full workflow
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn detect_backup_install_end_to_end() {
        let steam = SteamTree::new(&["1001"]);
        let mut session = Session::default();
        session.refresh(&steam.sources(), &NoopSink).unwrap();
        assert_eq!(session.profile().map(|p| p.as_str()), Some("1001"));

        let archive = steam.scratch().join("pro.zip");
        write_zip(
            &archive,
            &[
                ("cfg/autoexec.cfg", "fps_max 0"),
                ("video/cs2_video.txt", "preset"),
                ("notes.md", "hello"),
            ],
        );
        let request = InstallRequest::new(
            Payload::from_paths(vec![archive]).unwrap(),
            CategorySet::new(true, true),
        );

        let (sink, mut rx) = ChannelSink::new();
        let outcome =
            run_install_in_background(&session, request, Arc::new(sink), BackupPolicy::Abort)
                .await
                .unwrap();

        let backups: Vec<Category> = outcome.backups.iter().map(|(c, _)| *c).collect();
        assert_eq!(backups, vec![Category::Global, Category::PerUser]);
        for (_, path) in &outcome.backups {
            assert!(path.is_file());
        }
        assert_eq!(outcome.report.global_copied, 1);
        assert_eq!(outcome.report.user_copied, 1);
        assert_eq!(outcome.report.skipped, 1);

        let user_cfg = session.user_cfg().unwrap();
        assert_eq!(
            fs::read_to_string(user_cfg.join("cs2_video.txt")).unwrap(),
            "preset"
        );
        assert!(steam.global_cfg().join("cfg").join("autoexec.cfg").is_file());

        // The backup holds the files as they were before the install.
        let user_backup = session.backup_path(Category::PerUser).unwrap();
        assert!(zip_entries(&user_backup).contains("cs2_video.txt"));

        let mut rendered = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let Some(line) = event.as_log() {
                rendered.push(line.to_string());
            }
        }
        assert_eq!(rendered.last().map(String::as_str), Some("[OK] Done"));
        assert!(rendered.iter().all(|l| LogLine::parse(l).to_string() == *l));
    }

    // -----------------------------------------------------------------------
    // Event wire format
    // -----------------------------------------------------------------------

    #[test]
    fn events_match_fixture() {
        let fixture: Vec<serde_json::Value> =
            serde_json::from_str(&load_fixture("events.json")).unwrap();
        let cfg = PathBuf::from(
            "/srv/steam/steamapps/common/Counter-Strike Global Offensive/game/csgo/cfg",
        );
        let events = vec![
            Event::Log(LogLine::ok("Steam root: /srv/steam")),
            Event::Log(LogLine::warn("Global cfg directory not found")),
            Event::RootChanged {
                path: Some(PathBuf::from("/srv/steam")),
            },
            Event::GlobalCfgChanged {
                backup_path: Category::Global.backup_path(&cfg),
                path: Some(cfg),
            },
            Event::ProfileChanged {
                profile: Some("1001".into()),
            },
            Event::UserCfgChanged {
                path: None,
                backup_path: None,
            },
        ];

        assert_eq!(events.len(), fixture.len());
        for (event, expected) in events.iter().zip(&fixture) {
            assert_eq!(&serde_json::to_value(event).unwrap(), expected);
            let parsed: Event = serde_json::from_value(expected.clone()).unwrap();
            assert_eq!(&parsed, event);
        }
    }
}
