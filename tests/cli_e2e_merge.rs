//! End-to-end tests for the `json-compose merge` command.

mod common;
use common::prelude::*;

#[test]
fn test_merge_default_outfile() {
    let fixture = TestFixture::new()
        .with_file("base.json", fragments::BASE)
        .with_file("prod.json", fragments::PROD)
        .with_file("prod.mergelist.json", r#"["base.json", "prod.json"]"#);

    fixture
        .command()
        .arg("merge")
        .arg("prod.mergelist.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("out.merged.prod.mergelist.json"));

    assert_eq!(
        fixture.read_json("out.merged.prod.mergelist.json"),
        json!({"db": {"host": "db.example.org", "port": 5432}, "tags": ["b"]})
    );
}

#[test]
fn test_merge_output_format() {
    let fixture = TestFixture::new()
        .with_file("a.json", r#"{"a": {"b": 1}}"#)
        .with_file("a.mergelist.json", r#"["a.json"]"#);

    fixture
        .command()
        .args(["merge", "a.mergelist.json", "-o", "merged.json"])
        .assert()
        .success();

    fixture
        .child("merged.json")
        .assert("{\n    \"a\": {\n        \"b\": 1\n    }\n}\n");
}

#[test]
fn test_merge_fname_mode_uses_set_from_file_name() {
    let fixture = TestFixture::new().with_animals();

    fixture
        .command()
        .args(["merge", "snake.mergelist.json", "-o", "snake.json"])
        .assert()
        .success();

    assert_eq!(
        fixture.read_json("snake.json"),
        json!({"text": "Kaa has scales and says hiss."})
    );
}

#[test]
fn test_merge_named_mode() {
    let fixture = TestFixture::new().with_animals();

    fixture
        .command()
        .args(["merge", "cat.mergelist.json", "-o", "out.json"])
        .args(["--mode4symbols", "named", "--symset", "dog"])
        .assert()
        .success();

    assert_eq!(
        fixture.read_json("out.json"),
        json!({"text": "Fido has fur and says woof."})
    );
}

#[test]
fn test_merge_global_and_ignore_modes() {
    let fixture = TestFixture::new().with_animals();

    fixture
        .command()
        .args(["merge", "cat.mergelist.json", "-o", "global.json", "-m", "GLOBAL"])
        .assert()
        .success();
    fixture
        .command()
        .args(["merge", "cat.mergelist.json", "-o", "raw.json", "-m", "IGNORE"])
        .assert()
        .success();

    assert_eq!(
        fixture.read_json("global.json"),
        json!({"text": "${name} has fur and says ${noise}."})
    );
    assert_eq!(fixture.read_json("raw.json"), json!({"text": "${name} has ${skin} and says ${noise}."}));
}

#[test]
fn test_merge_dir_mode_writes_one_output_per_set() {
    let fixture = TestFixture::new().with_animals();

    fixture
        .command()
        .args(["merge", "cat.mergelist.json", "-o", "out/animal.json", "-m", "DIR"])
        .assert()
        .failure();

    fixture.child("out").create_dir_all().unwrap();
    fixture
        .command()
        .args(["merge", "cat.mergelist.json", "-o", "out/animal.json", "-m", "DIR"])
        .assert()
        .success();

    assert_eq!(
        fixture.read_json("out/animal.json"),
        json!({"text": "${name} has fur and says ${noise}."})
    );
    assert_eq!(
        fixture.read_json("out/cat/animal.json"),
        json!({"text": "Felix has fur and says meow."})
    );
    assert_eq!(
        fixture.read_json("out/snake/animal.json"),
        json!({"text": "Kaa has scales and says hiss."})
    );
}

#[test]
fn test_merge_error_mode_rejects_symbol_file() {
    let fixture = TestFixture::new().with_animals();

    fixture
        .command()
        .args(["merge", "cat.mergelist.json", "-m", "ERROR"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("symbol"));

    fixture.child("out.merged.cat.mergelist.json").assert(predicate::path::missing());
}

#[test]
fn test_merge_nested_lists() {
    let fixture = TestFixture::new()
        .with_file("base.json", fragments::BASE)
        .with_file("prod.json", fragments::PROD)
        .with_file("lists/base.mergelist.json", r#"["../base.json"]"#)
        .with_file(
            "lists/prod.mergelist.json",
            r#"["base.mergelist.json", "../prod.json"]"#,
        );

    fixture
        .command()
        .args(["merge", "lists/prod.mergelist.json", "-o", "prod.merged.json"])
        .assert()
        .success();

    assert_eq!(
        fixture.read_json("prod.merged.json"),
        json!({"db": {"host": "db.example.org", "port": 5432}, "tags": ["b"]})
    );
}

#[test]
fn test_merge_type_conflict_names_key_path() {
    let fixture = TestFixture::new()
        .with_file("a.json", r#"{"db": {"port": 1}}"#)
        .with_file("b.json", r#"{"db": {"port": {"value": 2}}}"#)
        .with_file("x.mergelist.json", r#"["a.json", "b.json"]"#);

    fixture
        .command()
        .args(["merge", "x.mergelist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("db.port"));
}

#[test]
fn test_merge_cycle_is_reported() {
    let fixture = TestFixture::new()
        .with_file("a.mergelist.json", r#"["b.mergelist.json"]"#)
        .with_file("b.mergelist.json", r#"["a.mergelist.json"]"#);

    fixture
        .command()
        .args(["merge", "a.mergelist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("b.mergelist.json"));
}

#[test]
fn test_merge_missing_output_directory() {
    let fixture = TestFixture::new()
        .with_file("a.json", "{}")
        .with_file("a.mergelist.json", r#"["a.json"]"#);

    fixture
        .command()
        .args(["merge", "a.mergelist.json", "-o", "missing/dir/out.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}
