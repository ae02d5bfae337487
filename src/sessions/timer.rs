use std::future::Future;
use tokio::task::JoinHandle;

/// At most one clock task runs at a time. Both `start` and `cancel` bump the
/// epoch, so a task past its last await can tell it is stale.
#[derive(Debug, Default)]
pub struct RoundTimer {
    epoch: u64,
    task: Option<JoinHandle<()>>,
}

impl RoundTimer {
    pub fn start<F, Fut>(&mut self, make_task: F) -> u64
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let epoch = self.epoch;
        self.task = Some(tokio::spawn(make_task(epoch)));
        epoch
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.epoch += 1;
    }

    /// Forgets the running task without aborting it.
    pub fn detach(&mut self) {
        self.task = None;
        self.epoch += 1;
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.task.is_some() && self.epoch == epoch
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for RoundTimer {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn counting_task(counter: Arc<AtomicU64>) -> impl Future<Output = ()> + Send + 'static {
        async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn starting_again_cancels_the_previous_task() {
        let first = Arc::new(AtomicU64::new(0));
        let second = Arc::new(AtomicU64::new(0));
        let mut timer = RoundTimer::default();

        let first_epoch = timer.start(|_| counting_task(first.clone()));
        tokio::time::sleep(Duration::from_millis(1500)).await;
        let second_epoch = timer.start(|_| counting_task(second.clone()));
        tokio::time::sleep(Duration::from_millis(3500)).await;

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 3);
        assert!(!timer.is_current(first_epoch));
        assert!(timer.is_current(second_epoch));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_the_task() {
        let counter = Arc::new(AtomicU64::new(0));
        let mut timer = RoundTimer::default();
        let epoch = timer.start(|_| counting_task(counter.clone()));
        tokio::time::sleep(Duration::from_millis(2500)).await;
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert!(!timer.is_current(epoch));
        assert!(!timer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn detach_keeps_the_task_alive_but_stale() {
        let counter = Arc::new(AtomicU64::new(0));
        let mut timer = RoundTimer::default();
        let epoch = timer.start(|_| counting_task(counter.clone()));
        timer.detach();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!timer.is_current(epoch));
    }
}
