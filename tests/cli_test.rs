#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use assert_cmd::Command;
    use predicates::prelude::*;
    use rowstore::{EMAIL_SIZE, PAGE_SIZE, ROW_SIZE, TABLE_MAX_PAGES, TABLE_MAX_ROWS, USERNAME_SIZE};
    use tempfile::{NamedTempFile, TempDir};

    // Helper function to run the command with a temporary database file
    fn run_commands<T: AsRef<str>>(commands: &[T]) -> Command {
        let db_path = create_db_path();
        run_commands_with_args(commands, &db_path)
    }

    fn create_db_path() -> PathBuf {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        let db_path: PathBuf = temp_file.path().to_path_buf();
        db_path
    }

    fn run_commands_with_args<T: AsRef<str>>(commands: &[T], db_path: &Path) -> Command {
        let mut cmd = Command::cargo_bin("rowstore").expect("Failed to run command");
        cmd.arg(db_path.to_str().expect("Invalid path"));

        let input = commands
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        cmd.write_stdin(input);
        cmd
    }

    #[test]
    fn it_inserts_and_retrieves_a_row() {
        let mut cmd = run_commands(&["insert 1 user1 person1@example.com", "select", ".exit"]);

        let expected = [
            "db > Executed.",
            "db > (1, user1, person1@example.com)",
            "Executed.",
            "db > ",
        ]
        .join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_prints_error_message_when_table_is_full() {
        let mut commands = Vec::new();
        for i in 0..TABLE_MAX_ROWS + 1 {
            commands.push(format!("insert {i} user{i} person{i}@example.com"));
        }
        commands.push(String::from(".exit"));

        let mut cmd = run_commands(&commands);

        cmd.assert()
            .success()
            .stdout(predicate::str::contains("db > Error: Table full."));
    }

    #[test]
    fn it_fills_and_save_full_table() {
        let mut commands = Vec::new();
        let mut expected = Vec::new();
        for i in 0..TABLE_MAX_ROWS {
            commands.push(format!("insert {i} user{i} person{i}@example.com"));
            expected.push(format!("({i}, user{i}, person{i}@example.com)"));
        }
        commands.push(String::from(".exit"));

        let db_path = create_db_path();
        let mut cmd = run_commands_with_args(&commands, &db_path);

        cmd.assert()
            .success()
            .stdout(predicate::str::ends_with("db > "));
        assert_eq!(
            std::fs::metadata(&db_path).unwrap().len(),
            (TABLE_MAX_PAGES * PAGE_SIZE) as u64
        );

        let mut cmd = run_commands_with_args(&["select", ".exit"], &db_path);
        let expected = expected.join("\n");
        cmd.assert()
            .success()
            .stdout(predicate::str::contains(expected));
    }

    #[test]
    fn it_allows_inserting_strings_that_are_the_maximum_length() {
        let long_username = "a".repeat(USERNAME_SIZE);
        let long_email = "a".repeat(EMAIL_SIZE);

        let commands = [
            format!("insert 1 {} {}", &long_username, &long_email),
            String::from("select"),
            String::from(".exit"),
        ];

        let mut cmd = run_commands(&commands);

        let expected = [
            String::from("db > Executed."),
            format!("db > (1, {}, {})", long_username, long_email),
            String::from("Executed."),
            String::from("db > "),
        ]
        .join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_prints_error_message_if_strings_are_too_long() {
        let long_username = "a".repeat(USERNAME_SIZE + 1);
        let long_email = "a".repeat(EMAIL_SIZE + 1);

        let commands = [
            format!("insert 1 {} {}", &long_username, &long_email),
            String::from("select"),
            String::from(".exit"),
        ];

        let mut cmd = run_commands(&commands);

        let expected = ["db > String is too long.", "db > Executed.", "db > "].join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_prints_error_message_if_id_is_negative() {
        let mut cmd = run_commands(&["insert -1 user1 person1@example.com", "select", ".exit"]);

        let expected = ["db > ID must be positive.", "db > Executed.", "db > "].join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_prints_error_message_on_bad_syntax() {
        let mut cmd = run_commands(&["insert 1 user1", "delete 1", ".tables", ".exit"]);

        let expected = [
            "db > Syntax error. Could not parse statement.",
            "db > Unrecognized command: delete 1",
            "db > Unrecognized meta-command: .tables",
            "db > ",
        ]
        .join("\n");

        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_keeps_data_after_closing_connection() {
        let db_path = create_db_path();

        let mut cmd =
            run_commands_with_args(&["insert 1 user1 person1@example.com", ".exit"], &db_path);
        let expected = ["db > Executed.", "db > "].join("\n");
        cmd.assert().success().stdout(expected);
        assert_eq!(std::fs::metadata(&db_path).unwrap().len(), ROW_SIZE as u64);

        let mut cmd = run_commands_with_args(&["select", ".exit"], &db_path);
        let expected = ["db > (1, user1, person1@example.com)\nExecuted.", "db > "].join("\n");
        cmd.assert().success().stdout(expected);
    }

    #[test]
    fn it_appends_after_reopening_a_multi_page_table() {
        let db_path = create_db_path();

        let commands: Vec<String> = (0..30)
            .map(|i| format!("insert {i} user{i} person{i}@example.com"))
            .chain([String::from(".exit")])
            .collect();
        run_commands_with_args(&commands, &db_path).assert().success();
        assert_eq!(
            std::fs::metadata(&db_path).unwrap().len(),
            (2 * PAGE_SIZE + 2 * ROW_SIZE) as u64
        );

        run_commands_with_args(&["insert 30 user30 person30@example.com", ".exit"], &db_path)
            .assert()
            .success()
            .stdout(["db > Executed.", "db > "].join("\n"));

        let expected = (0..31)
            .map(|i| format!("({i}, user{i}, person{i}@example.com)"))
            .collect::<Vec<_>>()
            .join("\n");
        run_commands_with_args(&["select", ".exit"], &db_path)
            .assert()
            .success()
            .stdout(format!("db > {expected}\nExecuted.\ndb > "));
    }

    #[test]
    fn it_closes_the_table_at_end_of_input() {
        let db_path = create_db_path();

        let mut cmd = run_commands_with_args(&["insert 7 user7 person7@example.com"], &db_path);
        cmd.assert().success();

        let mut cmd = run_commands_with_args(&["select"], &db_path);
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("(7, user7, person7@example.com)"));
    }

    #[test]
    fn it_fails_when_the_file_cannot_be_opened() {
        let dir = TempDir::new().expect("Failed to create temporary directory");

        // A directory can't be opened as a database file.
        let mut cmd = run_commands_with_args(&[".exit"], dir.path());
        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("Unable to open file"));
    }
}
