use cosmoprop::{cli, exit_on_error, io::utils as io_utils};
use lazy_static::lazy_static;
use std::{
    ffi::OsString,
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

#[macro_export]
macro_rules! def_test {
    (
        IN[$($in_ident:ident = $in_str:expr),*]
        OUT[$($out_ident:ident = $out_str:expr),*]
        fn $name:ident $test_body:expr
    ) => {
        #[test]
        fn $name() {
            let test = common::Test::new(stringify!($name));

            $( let $in_ident = test.input_path($in_str); )*
            $( let $out_ident = test.output_path($out_str); )*

            let test_body = |$( $in_ident, )* $( $out_ident, )*| $test_body;

            test_body(
                $( path_str!($in_ident), )* $( path_str!($out_ident), )*
            );
        }
    };
}

#[macro_export]
macro_rules! path_str {
    ($path:expr) => {
        $path.to_string_lossy().as_ref()
    };
}

pub fn run<I, T>(args: I)
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    cli::run::run_with_args(COMMAND.clone().get_matches_from(args));
}

pub fn assert_file_exists<P: AsRef<Path>>(file_path: P) {
    let file_path = file_path.as_ref();
    let exists = file_path.exists();
    assert!(
        exists,
        "File {} does not exist",
        file_path.to_string_lossy()
    );
}

pub fn assert_files_identical<P1, P2>(file_path_1: P1, file_path_2: P2)
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let file_path_1 = file_path_1.as_ref();
    let file_path_2 = file_path_2.as_ref();

    let identical = exit_on_error!(
        file_content_is_identical(file_path_1, file_path_2),
        "Error: Could not read files for comparison: {}"
    );
    assert!(
        identical,
        "Files {} and {} not identical",
        file_path_1.to_string_lossy(),
        file_path_2.to_string_lossy()
    );
}

pub fn assert_files_differ<P1, P2>(file_path_1: P1, file_path_2: P2)
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let file_path_1 = file_path_1.as_ref();
    let file_path_2 = file_path_2.as_ref();

    let identical = exit_on_error!(
        file_content_is_identical(file_path_1, file_path_2),
        "Error: Could not read files for comparison: {}"
    );
    assert!(
        !identical,
        "Files {} and {} are identical",
        file_path_1.to_string_lossy(),
        file_path_2.to_string_lossy()
    );
}

/// Reads the non-comment lines of a text file and splits them into
/// whitespace separated fields.
pub fn read_table_rows<P: AsRef<Path>>(file_path: P) -> Vec<Vec<String>> {
    let text = exit_on_error!(
        io_utils::read_text_file(file_path),
        "Error: Could not read table: {}"
    );
    text.lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| line.split_whitespace().map(String::from).collect())
        .collect()
}

#[derive(Debug, Clone)]
pub struct Test {
    output_dir: PathBuf,
}

impl Test {
    pub fn new<S: AsRef<str>>(name: S) -> Self {
        let name = name.as_ref();
        let output_dir = exit_on_error!(
            CONTEXT.prepared_output_dir(name),
            "Error: Could not prepare output directory for test {}: {}",
            name
        );
        Self { output_dir }
    }

    pub fn input_path<S: AsRef<str>>(&self, file_name: S) -> PathBuf {
        CONTEXT.input_path(file_name)
    }

    pub fn output_path<S: AsRef<str>>(&self, file_name: S) -> PathBuf {
        self.output_dir().join(file_name.as_ref())
    }

    fn output_dir(&self) -> &Path {
        self.output_dir.as_path()
    }
}

#[derive(Debug, Clone)]
pub struct TestContext {
    base_input_dir: PathBuf,
    base_output_dir: PathBuf,
}

impl TestContext {
    const BASE_INPUT_DIR_PATH_COMPONENTS: [&'static str; 3] = ["tests", "data", "input"];
    const BASE_OUTPUT_DIR_PATH_COMPONENTS: [&'static str; 3] = ["tests", "data", "output"];

    fn new() -> Self {
        let base_input_dir: PathBuf = Self::BASE_INPUT_DIR_PATH_COMPONENTS.iter().collect();
        let base_output_dir: PathBuf = Self::BASE_OUTPUT_DIR_PATH_COMPONENTS.iter().collect();
        Self {
            base_input_dir,
            base_output_dir,
        }
    }

    pub fn input_path<S: AsRef<str>>(&self, file_name: S) -> PathBuf {
        self.base_input_dir().join(file_name.as_ref())
    }

    pub fn output_dir<S: AsRef<str>>(&self, test_name: S) -> PathBuf {
        self.base_output_dir().join(test_name.as_ref())
    }

    pub fn output_path<S1, S2>(&self, test_name: S1, file_name: S2) -> PathBuf
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        self.output_dir(test_name).join(file_name.as_ref())
    }

    pub fn prepared_output_dir<S: AsRef<str>>(&self, test_name: S) -> io::Result<PathBuf> {
        let output_dir = self.output_dir(test_name);
        Self::clear_output_dir(&output_dir)
            .and_then(|_| Self::create_output_dir(&output_dir).map(|_| output_dir))
    }

    fn clear_output_dir<P: AsRef<Path>>(output_dir: P) -> io::Result<()> {
        let output_dir = output_dir.as_ref();
        if output_dir.exists() {
            fs::remove_dir_all(output_dir)
        } else {
            Ok(())
        }
    }

    fn create_output_dir<P: AsRef<Path>>(output_dir: P) -> io::Result<()> {
        fs::create_dir_all(output_dir)
    }

    fn base_input_dir(&self) -> &Path {
        self.base_input_dir.as_path()
    }

    fn base_output_dir(&self) -> &Path {
        self.base_output_dir.as_path()
    }
}

lazy_static! {
    pub static ref CONTEXT: TestContext = TestContext::new();
    static ref COMMAND: clap::Command<'static> = cli::build::build().no_binary_name(true);
}

fn file_content_is_identical<P1, P2>(file_path_1: P1, file_path_2: P2) -> io::Result<bool>
where
    P1: AsRef<Path>,
    P2: AsRef<Path>,
{
    let file_1 = io_utils::open_file_and_map_err(file_path_1)?;
    let file_2 = io_utils::open_file_and_map_err(file_path_2)?;

    let mut reader_1 = io::BufReader::new(file_1);
    let mut reader_2 = io::BufReader::new(file_2);

    const BUFFER_SIZE: usize = 10000; // Bytes
    let mut buffer_1 = [0; BUFFER_SIZE];
    let mut buffer_2 = [0; BUFFER_SIZE];

    loop {
        let n_bytes_read_1 = reader_1.read(&mut buffer_1)?;
        let n_bytes_read_2 = reader_2.read(&mut buffer_2)?;

        if n_bytes_read_1 == 0 && n_bytes_read_2 == 0 {
            break Ok(true);
        } else if n_bytes_read_2 != n_bytes_read_1 || buffer_1 != buffer_2 {
            break Ok(false);
        }
    }
}
