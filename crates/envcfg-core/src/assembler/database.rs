//! Tracker database driver selection

use envcfg_content::ConfigValue;

use super::{AssembleError, Fields, FlatRecord, Fragment, Section};

/// Tracker persistence backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Database {
    Sqlite {
        database_name: Option<String>,
    },
    Mysql {
        host: Option<String>,
        port: Option<i64>,
        database_name: Option<String>,
        username: Option<String>,
        password: Option<String>,
    },
}

impl Database {
    /// Record key selecting the variant
    pub const DISCRIMINANT: &'static str = "database_driver";

    pub fn from_record(record: &FlatRecord) -> Result<Self, AssembleError> {
        let driver = record
            .discriminant(Self::DISCRIMINANT)?
            .ok_or_else(|| AssembleError::MissingDiscriminant {
                discriminant: Self::DISCRIMINANT.to_string(),
            })?;

        match driver.as_str() {
            "sqlite3" | "sqlite" => Ok(Self::Sqlite {
                database_name: record.text("sqlite_database_name")?,
            }),
            "mysql" => Ok(Self::Mysql {
                host: record.text("mysql_host")?,
                port: record.int("mysql_port")?,
                database_name: record.text("mysql_database_name")?,
                username: record.text("mysql_username")?,
                password: record.text("mysql_password")?,
            }),
            _ => Err(AssembleError::UnknownVariant {
                discriminant: Self::DISCRIMINANT.to_string(),
                value: driver,
            }),
        }
    }

    /// Driver name as the tracker spells it
    pub fn driver(&self) -> &'static str {
        match self {
            Self::Sqlite { .. } => "sqlite3",
            Self::Mysql { .. } => "mysql",
        }
    }

    pub fn to_value(&self) -> ConfigValue {
        let mut fields = Fields::tagged("driver", self.driver());
        match self {
            Self::Sqlite { database_name } => {
                fields.set("database_name", database_name.clone());
            }
            Self::Mysql {
                host,
                port,
                database_name,
                username,
                password,
            } => {
                fields
                    .set("host", host.clone())
                    .set("port", *port)
                    .set("database_name", database_name.clone())
                    .set("username", username.clone())
                    .set("password", password.clone());
            }
        }
        fields.into_value()
    }
}

/// `tracker.core.database` <- discriminant `database_driver`
#[derive(Debug, Clone, Copy)]
pub struct DatabaseSection;

impl Section for DatabaseSection {
    fn name(&self) -> &'static str {
        "database"
    }

    fn fragments(&self, record: &FlatRecord) -> Result<Vec<Fragment>, AssembleError> {
        let database = Database::from_record(record)?;
        Ok(vec![Fragment::new(&["tracker", "core", "database"], database.to_value())])
    }
}
