//! `touch` and `cache` commands.

use anyhow::{Result, bail};

use super::args::{CacheAction, EventArg};
use crate::cache::{CacheManager, ChangeEvent};
use crate::log;
use crate::utils::date::unix_now;

/// Record a content change at the current time.
pub fn touch(cache: &CacheManager, event: EventArg, option: Option<&str>) -> Result<()> {
    let Some(event) = ChangeEvent::parse(event.as_str(), option) else {
        bail!("unknown event `{}`", event.as_str());
    };
    if cache.touch(&event, unix_now())? {
        log!("touch"; "cached output invalidated");
    } else {
        log!("touch"; "{} does not invalidate cached output", event_name(&event));
    }
    Ok(())
}

pub fn run(cache: &CacheManager, action: &CacheAction) -> Result<()> {
    match action {
        CacheAction::Clear => {
            let removed = cache.clear()?;
            log!("cache"; "removed {} entr{}", removed, if removed == 1 { "y" } else { "ies" });
        }
    }
    Ok(())
}

fn event_name(event: &ChangeEvent) -> String {
    match event {
        ChangeEvent::UpdatedOption(key) => format!("update of option `{key}`"),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CACHE_KEY, OPTION_KEY, Partition};

    #[test]
    fn test_touch_and_clear() {
        let cache = CacheManager::memory(3600);
        let now = unix_now();
        cache.write(&Partition::Home, "<meta/>", now - 10);

        touch(&cache, EventArg::UpdatedOption, Some(OPTION_KEY)).unwrap();
        assert_eq!(cache.store().time_modified().unwrap(), 0);

        touch(&cache, EventArg::SavePost, None).unwrap();
        assert!(cache.store().time_modified().unwrap() >= now);
        assert!(cache.read(&Partition::Home, now).is_none());

        run(&cache, &CacheAction::Clear).unwrap();
        assert!(cache.store().get(&Partition::Home, CACHE_KEY).unwrap().is_none());
    }
}
