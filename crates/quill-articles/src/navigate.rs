//! Leaving the form once it is done.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

pub trait Navigator {
    /// Open `route` now.
    fn navigate(&self, route: &str);

    /// Open `route` after `delay`. Returns immediately.
    fn schedule(&self, delay: Duration, route: &str);
}

impl<V: Navigator + ?Sized> Navigator for &V {
    fn navigate(&self, route: &str) {
        (**self).navigate(route)
    }

    fn schedule(&self, delay: Duration, route: &str) {
        (**self).schedule(delay, route)
    }
}

impl<V: Navigator + ?Sized> Navigator for Arc<V> {
    fn navigate(&self, route: &str) {
        (**self).navigate(route)
    }

    fn schedule(&self, delay: Duration, route: &str) {
        (**self).schedule(delay, route)
    }
}

/// Calls `F` with the route, deferring scheduled routes to a tokio task.
///
/// `schedule` must be called inside a tokio runtime.
#[derive(Clone)]
pub struct DelayedNavigator<F> {
    open: Arc<F>,
}

impl<F> DelayedNavigator<F>
where
    F: Fn(&str) + Send + Sync + 'static,
{
    pub fn new(open: F) -> Self {
        Self {
            open: Arc::new(open),
        }
    }
}

impl<F> Navigator for DelayedNavigator<F>
where
    F: Fn(&str) + Send + Sync + 'static,
{
    fn navigate(&self, route: &str) {
        debug!(route, "navigating");
        (self.open)(route);
    }

    fn schedule(&self, delay: Duration, route: &str) {
        let open = self.open.clone();
        let route = route.to_owned();
        debug!(route = %route, ?delay, "navigation scheduled");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(route = %route, "navigating");
            open(&route);
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_schedule_waits_for_delay() {
        let opened = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = opened.clone();
        let navigator = DelayedNavigator::new(move |route: &str| {
            sink.lock().unwrap().push(route.to_owned());
        });

        navigator.schedule(Duration::from_millis(1500), "/news");
        tokio::task::yield_now().await;
        assert!(opened.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(1499)).await;
        assert!(opened.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*opened.lock().unwrap(), vec!["/news"]);
    }

    #[test]
    fn test_navigate_is_immediate() {
        let opened = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = opened.clone();
        let navigator = DelayedNavigator::new(move |route: &str| {
            sink.lock().unwrap().push(route.to_owned());
        });
        navigator.navigate("/news");
        assert_eq!(*opened.lock().unwrap(), vec!["/news"]);
    }
}
