use crate::conda::CondaManager;
use crate::manager::EnvManager;
use crate::mock::MockManager;
use crate::registry::EnvRegistry;
use crate::venv::VenvManager;
use crate::ManagerError;

/// Every name `build_manager` understands.
pub const KNOWN_MANAGERS: &[&str] = &["conda", "mamba", "venv", "mock"];
/// Probe order when the caller states no preference.
pub const DEFAULT_PREFERENCES: &[&str] = &["conda", "mamba", "venv"];

/// Construct the manager called `name`, or `None` for an unknown name.
pub fn build_manager(name: &str, registry: &EnvRegistry) -> Option<Box<dyn EnvManager>> {
    let registry = registry.clone();
    match name {
        "conda" => Some(Box::new(CondaManager::conda(registry))),
        "mamba" => Some(Box::new(CondaManager::mamba(registry))),
        "venv" => Some(Box::new(VenvManager::new(registry))),
        "mock" => Some(Box::new(MockManager::new(registry))),
        _ => None,
    }
}

/// The first candidate whose tool is available. Probing stops at the first hit.
pub fn first_available<I>(candidates: I) -> Option<Box<dyn EnvManager>>
where
    I: IntoIterator<Item = Box<dyn EnvManager>>,
{
    candidates.into_iter().find(|m| m.is_available())
}

/// Pick the first available manager from `preferences` (or
/// [`DEFAULT_PREFERENCES`]). Unknown names are skipped.
pub fn select_manager(
    preferences: Option<&[&str]>,
    registry: &EnvRegistry,
) -> Result<Box<dyn EnvManager>, ManagerError> {
    let names = preferences.unwrap_or(DEFAULT_PREFERENCES);
    registry.in_scope(|| {
        let candidates = names.iter().filter_map(|name| {
            let manager = build_manager(name, registry);
            if manager.is_none() {
                tracing::warn!("unknown environment manager '{name}', skipping");
            }
            manager
        });
        match first_available(candidates) {
            Some(manager) => {
                tracing::info!("using environment manager '{}'", manager.name());
                Ok(manager)
            }
            None => Err(ManagerError::NoManagerAvailable(
                names.iter().map(|n| (*n).to_owned()).collect(),
            )),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_registry() -> (tempfile::TempDir, EnvRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let registry = EnvRegistry::at(dir.path()).unwrap();
        (dir, registry)
    }

    #[test]
    fn builds_every_known_manager() {
        let (_dir, registry) = test_registry();
        for name in KNOWN_MANAGERS {
            let manager = build_manager(name, &registry).unwrap();
            assert_eq!(manager.name(), *name);
        }
        assert!(build_manager("dummy", &registry).is_none());
    }

    #[test]
    fn selects_mock_by_preference() {
        let (_dir, registry) = test_registry();
        let manager = select_manager(Some(&["mock"][..]), &registry).unwrap();
        assert_eq!(manager.name(), "mock");
    }

    #[test]
    fn unknown_names_are_skipped() {
        let (_dir, registry) = test_registry();
        let manager = select_manager(Some(&["dummy", "mock"][..]), &registry).unwrap();
        assert_eq!(manager.name(), "mock");
    }

    #[test]
    fn only_unknown_names_fail() {
        let (_dir, registry) = test_registry();
        let err = select_manager(Some(&["dummy"][..]), &registry).err().unwrap();
        assert!(matches!(err, ManagerError::NoManagerAvailable(ref tried) if tried == &["dummy"]));
    }

    #[test]
    fn empty_preferences_fail() {
        let (_dir, registry) = test_registry();
        assert!(matches!(
            select_manager(Some(&[][..]), &registry),
            Err(ManagerError::NoManagerAvailable(_))
        ));
    }

    #[test]
    fn first_available_keeps_order() {
        let (_dir, registry) = test_registry();
        let candidates: Vec<Box<dyn EnvManager>> = vec![
            Box::new(
                MockManager::new(registry.clone())
                    .with_name("down")
                    .with_available(false),
            ),
            Box::new(MockManager::new(registry.clone()).with_name("first")),
            Box::new(MockManager::new(registry).with_name("second")),
        ];
        assert_eq!(first_available(candidates).unwrap().name(), "first");
    }

    #[test]
    fn first_available_of_none_available() {
        let (_dir, registry) = test_registry();
        let candidates: Vec<Box<dyn EnvManager>> =
            vec![Box::new(MockManager::new(registry).with_available(false))];
        assert!(first_available(candidates).is_none());
    }
}
