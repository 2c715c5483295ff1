// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for settings layer precedence.
//!
//! make.globals < make.defaults < make.conf < environment.

mod common;

use common::{write_make_conf, MockSettingsSource};
use portcfg::prelude::*;

#[test]
#[cfg(feature = "make-conf")]
fn test_user_conf_overrides_globals() {
    let globals = write_make_conf("PORTDIR=/usr/portage\nARCH=x86\n");
    let user = write_make_conf("PORTDIR=\"/var/db/repos/gentoo\"\n");

    let loader = SettingsLoader::builder()
        .with_make_conf_file(user.path(), PRIORITY_USER)
        .unwrap()
        .with_make_conf_file(globals.path(), PRIORITY_GLOBALS)
        .unwrap()
        .build();

    let store = loader.load();
    assert_eq!(store.mainline_tree_directory(), "/var/db/repos/gentoo");
    assert_eq!(store.architecture().as_deref(), Some("x86"));
}

#[test]
#[cfg(feature = "make-conf")]
fn test_use_flags_accumulate_across_layers() {
    let globals = write_make_conf("USE=\"X gtk alsa\"\n");
    let profile = write_make_conf("USE=\"-gtk qt5\"\nFEATURES=\"sandbox distlocks\"\n");
    let user = write_make_conf("USE=\"gtk -alsa\"\nFEATURES=\"-* ccache\"\n");

    let loader = SettingsLoader::builder()
        .with_make_conf_file(globals.path(), PRIORITY_GLOBALS)
        .unwrap()
        .with_make_conf_file(profile.path(), PRIORITY_PROFILE)
        .unwrap()
        .with_make_conf_file(user.path(), PRIORITY_USER)
        .unwrap()
        .build();

    let store = loader.load();
    assert_eq!(store.value("USE").as_deref(), Some("X qt5 gtk"));
    assert_eq!(store.value("FEATURES").as_deref(), Some("ccache"));
}

#[test]
#[cfg(all(feature = "make-conf", feature = "env"))]
fn test_environment_has_the_last_word() {
    let user = write_make_conf("ACCEPT_KEYWORDS=\"amd64\"\nPORTDIR=/var/db/repos/gentoo\n");

    let loader = SettingsLoader::builder()
        .with_make_conf_file(user.path(), PRIORITY_USER)
        .unwrap()
        .with_source(Box::new(EnvVarAdapter::with_values([
            ("ACCEPT_KEYWORDS", "~amd64"),
            ("PORTDIR", "/srv/tree"),
        ])))
        .build();

    let store = loader.load();
    assert_eq!(store.value("ACCEPT_KEYWORDS").as_deref(), Some("amd64 ~amd64"));
    assert_eq!(store.accepted_keyword().as_deref(), Some("~amd64"));
    assert_eq!(store.mainline_tree_directory(), "/srv/tree");
}

#[test]
#[cfg(feature = "make-conf")]
fn test_plain_append_and_cross_layer_references() {
    let globals = write_make_conf("PORTDIR=/usr/portage\nDISTDIR=\"${PORTDIR}/distfiles\"\n");
    let user = write_make_conf(
        "PORTDIR=/srv/tree\nCFLAGS=\"-O2\"\nCFLAGS+=\" -pipe\"\nPORTDIR_OVERLAY=\"$PORTDIR/local\"\n",
    );

    let loader = SettingsLoader::builder()
        .with_make_conf_file(globals.path(), PRIORITY_GLOBALS)
        .unwrap()
        .with_make_conf_file(user.path(), PRIORITY_USER)
        .unwrap()
        .build();

    let store = loader.load();
    // resolved against the final PORTDIR, not the one in scope when declared
    assert_eq!(store.value("DISTDIR").as_deref(), Some("/srv/tree/distfiles"));
    assert_eq!(store.value("CFLAGS").as_deref(), Some("-O2 -pipe"));
    assert_eq!(store.overlay_tree_directories(), vec!["/srv/tree/local".to_string()]);
}

#[test]
fn test_equal_priority_sources_apply_in_registration_order() {
    let loader = SettingsLoader::builder()
        .with_source(Box::new(MockSettingsSource::new(
            "first",
            PRIORITY_PROFILE,
            vec![
                Declaration::assign("ARCH", "x86"),
                Declaration::assign("USE", "a b"),
            ],
        )))
        .with_source(Box::new(MockSettingsSource::new(
            "second",
            PRIORITY_PROFILE,
            vec![
                Declaration::assign("ARCH", "amd64"),
                Declaration::assign("USE", "-a c"),
            ],
        )))
        .build();

    let store = loader.load();
    assert_eq!(store.architecture().as_deref(), Some("amd64"));
    assert_eq!(store.value("USE").as_deref(), Some("b c"));
}

#[test]
fn test_failing_source_does_not_block_others() {
    let loader = SettingsLoader::builder()
        .with_source(Box::new(MockSettingsSource::new(
            "globals",
            PRIORITY_GLOBALS,
            vec![Declaration::assign("PORTDIR", "/usr/portage")],
        )))
        .with_source(Box::new(MockSettingsSource::failing("profile", PRIORITY_PROFILE)))
        .with_source(Box::new(MockSettingsSource::new(
            "user",
            PRIORITY_USER,
            vec![Declaration::assign("ARCH", "arm64")],
        )))
        .build();

    assert_eq!(loader.source_names(), vec!["globals", "profile", "user"]);
    let store = loader.load();
    assert_eq!(store.mainline_tree_directory(), "/usr/portage");
    assert_eq!(store.architecture().as_deref(), Some("arm64"));
}

#[test]
#[cfg(feature = "make-conf")]
fn test_missing_file_is_an_error() {
    let result = SettingsLoader::builder()
        .with_make_conf_file("/nonexistent/portcfg/make.conf", PRIORITY_USER);
    assert!(matches!(result, Err(ConfigError::SourceError { .. })));
}

#[test]
#[cfg(feature = "make-conf")]
fn test_malformed_file_reports_line() {
    let broken = write_make_conf("PORTDIR=/usr/portage\n\nnot an assignment\n");

    let err = match SettingsLoader::builder().with_make_conf_file(broken.path(), PRIORITY_USER) {
        Ok(_) => panic!("expected a parse failure"),
        Err(e) => e,
    };
    assert!(err.to_string().contains("line 3"), "unexpected error: {}", err);
}
