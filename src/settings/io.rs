use bevy::log::{error, info};
use directories_next::ProjectDirs;
use std::fs;
use std::io::{self, BufReader, BufWriter, ErrorKind};
use std::path::PathBuf;

const QUALIFIER: &str = "rs";
const ORGANIZATION: &str = "fakturnik";
const APPLICATION: &str = "fakturnik";
const SETTINGS_FILE: &str = "app_settings.json";
const CATALOG_SNAPSHOT_FILE: &str = "catalog_snapshot.json";

fn config_path(file_name: &str) -> io::Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION) {
        let config_dir = proj_dirs.config_dir();
        fs::create_dir_all(config_dir)?;
        Ok(config_dir.join(file_name))
    } else {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine project directories for app settings.",
        ))
    }
}

fn load_json_file<T: for<'de> serde::de::Deserialize<'de>>(file_name: &str) -> io::Result<Option<T>> {
    let path = config_path(file_name)?;
    match fs::File::open(&path) {
        Ok(file) => {
            let reader = BufReader::new(file);
            match serde_json::from_reader(reader) {
                Ok(value) => Ok(Some(value)),
                Err(e) => {
                    error!("Persistence: failed to parse {:?}: {}", path, e);
                    Err(io::Error::new(
                        ErrorKind::InvalidData,
                        format!("Failed to parse {}: {}", file_name, e),
                    ))
                }
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("Persistence: {:?} not found.", path);
            Ok(None)
        }
        Err(e) => {
            error!("Persistence: failed to open {:?}: {}", path, e);
            Err(e)
        }
    }
}

fn save_json_file<T: serde::Serialize>(file_name: &str, value: &T) -> io::Result<()> {
    let path = config_path(file_name)?;
    info!("Persistence: saving {:?}", path);
    let file = fs::File::create(&path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value).map_err(|e| {
        error!("Persistence: failed to serialize to {:?}: {}", path, e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;
    Ok(())
}

pub fn load_settings<T: for<'de> serde::de::Deserialize<'de> + Default>() -> T {
    match load_json_file(SETTINGS_FILE) {
        Ok(Some(settings)) => {
            info!("AppSettings: loaded stored settings.");
            settings
        }
        Ok(None) => T::default(),
        Err(_) => T::default(),
    }
}

pub fn save_settings<T: serde::Serialize>(settings: &T) -> io::Result<()> {
    save_json_file(SETTINGS_FILE, settings)
}

pub fn load_catalog_snapshot<T: for<'de> serde::de::Deserialize<'de>>() -> io::Result<Option<T>> {
    load_json_file(CATALOG_SNAPSHOT_FILE)
}

pub fn save_catalog_snapshot<T: serde::Serialize>(snapshot: &T) -> io::Result<()> {
    save_json_file(CATALOG_SNAPSHOT_FILE, snapshot)
}
