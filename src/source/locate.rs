//! Finds the stream file that a `ck run` of the VQE program writes to.
//!
//! CK keeps program entries in repositories laid out as `<CK_REPOS>/<repo>/program/<program>`,
//! the VQE programs write their progress to `tmp/vqe_stream.json` inside their entry.

use crate::util::*;

/// Environment variable selecting the quantum provider.
pub const PROVIDER_ENV: &str = "VQE_QUANTUM_PROVIDER";
/// Environment variable pointing to the directory of CK repositories.
pub const CK_REPOS_ENV: &str = "CK_REPOS";
/// Path of the stream file relative to the program entry.
pub const STREAM_FILE_RELATIVE_PATH: [&str; 2] = ["tmp", "vqe_stream.json"];

/// Quantum providers with a VQE program in CK.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// IBM Quantum, through Qiskit.
    #[default]
    Ibm,
    /// Rigetti, through pyQuil.
    Rigetti,
}

impl Provider {
    /// Name of the CK program entry running VQE on this provider.
    pub fn program_name(self) -> &'static str {
        match self {
            Provider::Ibm => "qiskit-vqe",
            Provider::Rigetti => "rigetti-vqe2",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Ibm => write!(f, "ibm"),
            Provider::Rigetti => write!(f, "rigetti"),
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ibm" => Ok(Provider::Ibm),
            "rigetti" => Ok(Provider::Rigetti),
            _ => Err(format!(
                "Unknown quantum provider `{s}`, expected one of: ibm, rigetti"
            )),
        }
    }
}

/// Determine the stream file to follow from the config, falling back to the environment for what isn't set.
pub fn resolve_stream_file(cfg: &impl InputOutputOpt) -> io::Result<PathBuf> {
    if let Some(file) = cfg.input_file() {
        return Ok(file.to_path_buf());
    }

    let provider = match cfg.provider() {
        Some(provider) => provider,
        None => provider_from_env(env::var(PROVIDER_ENV).ok().as_deref())?,
    };
    let ck_repos = match cfg.ck_repos() {
        Some(dir) => dir.to_path_buf(),
        None => ck_repos_from_env(env::var_os(CK_REPOS_ENV), env::var_os("HOME"))?,
    };
    log::debug!(
        "Looking for CK program `{program}` of provider `{provider}` in {repos}",
        program = provider.program_name(),
        repos = ck_repos.display()
    );

    let entry = find_program_entry(&ck_repos, provider.program_name())?;
    Ok(stream_file_path(&entry))
}

fn provider_from_env(value: Option<&str>) -> io::Result<Provider> {
    match value {
        Some(name) => Provider::from_str(name).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("{PROVIDER_ENV}: {e}"))
        }),
        None => Ok(Provider::default()),
    }
}

fn ck_repos_from_env(
    ck_repos: Option<std::ffi::OsString>,
    home: Option<std::ffi::OsString>,
) -> io::Result<PathBuf> {
    match (ck_repos, home) {
        (Some(dir), _) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        (_, Some(home)) => Ok(PathBuf::from(home).join("CK")),
        _ => Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Cannot locate CK repositories: neither {CK_REPOS_ENV} nor HOME is set"),
        )),
    }
}

/// Search the CK repositories under `ck_repos` for the entry of `program`.
///
/// `ck_repos` may also be a single repository. Repositories are searched in sorted order and the first match wins.
pub fn find_program_entry(ck_repos: &Path, program: &str) -> io::Result<PathBuf> {
    let direct = ck_repos.join("program").join(program);
    if direct.is_dir() {
        return Ok(direct);
    }

    let repos = fs::read_dir(ck_repos).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!(
                "Cannot read CK repositories in {dir}: {e}",
                dir = ck_repos.display()
            ),
        )
    })?;

    repos
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .sorted()
        .map(|repo| repo.join("program").join(program))
        .find(|entry| entry.is_dir())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!(
                    "CK program `{program}` not found in any repository in {dir}",
                    dir = ck_repos.display()
                ),
            )
        })
}

/// Path of the stream file inside a program entry.
pub fn stream_file_path(program_entry: &Path) -> PathBuf {
    STREAM_FILE_RELATIVE_PATH
        .iter()
        .fold(program_entry.to_path_buf(), |path, part| path.join(part))
}
