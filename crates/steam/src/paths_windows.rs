use crate::SteamError;
use crate::probe::RootSource;

/// Registry hive a Steam path value lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hive {
    CurrentUser,
    LocalMachine,
}

/// A named string value under a registry key.
#[derive(Debug, Clone)]
pub struct RegistrySource {
    pub hive: Hive,
    pub subkey: &'static str,
    pub value: &'static str,
}

/// Returns the registry values Steam is known to write, most specific first.
pub(crate) fn registry_sources() -> Vec<Box<dyn RootSource>> {
    [
        (Hive::CurrentUser, r"Software\Valve\Steam", "SteamPath"),
        (Hive::CurrentUser, r"Software\Valve\Steam", "InstallPath"),
        (Hive::LocalMachine, r"SOFTWARE\Valve\Steam", "InstallPath"),
        (
            Hive::LocalMachine,
            r"SOFTWARE\Wow6432Node\Valve\Steam",
            "InstallPath",
        ),
    ]
    .into_iter()
    .map(|(hive, subkey, value)| {
        Box::new(RegistrySource {
            hive,
            subkey,
            value,
        }) as Box<dyn RootSource>
    })
    .collect()
}

impl RootSource for RegistrySource {
    fn describe(&self) -> String {
        let hive = match self.hive {
            Hive::CurrentUser => "HKCU",
            Hive::LocalMachine => "HKLM",
        };
        format!(r"{hive}\{}\{}", self.subkey, self.value)
    }

    fn read(&self) -> Result<String, SteamError> {
        use winreg::RegKey;
        use winreg::enums::{HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE};

        let root = RegKey::predef(match self.hive {
            Hive::CurrentUser => HKEY_CURRENT_USER,
            Hive::LocalMachine => HKEY_LOCAL_MACHINE,
        });
        let key = root
            .open_subkey(self.subkey)
            .map_err(|e| SteamError::Registry(e.to_string()))?;
        key.get_value::<String, _>(self.value)
            .map_err(|e| SteamError::Registry(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_order() {
        let sources = registry_sources();
        let described: Vec<String> = sources.iter().map(|s| s.describe()).collect();
        assert_eq!(
            described,
            vec![
                r"HKCU\Software\Valve\Steam\SteamPath",
                r"HKCU\Software\Valve\Steam\InstallPath",
                r"HKLM\SOFTWARE\Valve\Steam\InstallPath",
                r"HKLM\SOFTWARE\Wow6432Node\Valve\Steam\InstallPath",
            ]
        );
    }
}
