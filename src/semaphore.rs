use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::Error;

/* ---------- */

/// A counting semaphore built on a [`Mutex`] and a [`Condvar`].
///
/// [`Semaphore::acquire`] blocks while no permit is available and
/// [`Semaphore::release`] hands one back, waking a single waiter.
///
/// A semaphore can be closed. Permits that remain after [`Semaphore::close`] are still
/// granted, but once the count drops to zero every acquire returns [`Error::Closed`]
/// instead of blocking.
///
/// # Examples
///
/// ```
/// # use conveyor::Semaphore;
/// let permits = Semaphore::new(1);
///
/// permits.acquire().unwrap();
/// assert_eq!(permits.available(), 0);
///
/// permits.release().unwrap();
/// assert_eq!(permits.available(), 1);
/// ```
#[derive(Debug)]
pub struct Semaphore {
    permits: Mutex<Permits>,
    changed: Condvar,
}

#[derive(Debug)]
struct Permits {
    count: usize,
    closed: bool,
}

impl Semaphore {
    /// Returns a new open semaphore holding `permits` permits.
    #[inline]
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(Permits {
                count: permits,
                closed: false,
            }),
            changed: Condvar::new(),
        }
    }

    /// Takes one permit, blocking the calling thread until one is available.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Closed`] if the semaphore is closed and has no permit left,
    /// [`Error::Poisoned`] if its lock was poisoned.
    pub fn acquire(&self) -> Result<(), Error> {
        let mut permits = self.lock()?;

        loop {
            if permits.count > 0 {
                permits.count -= 1;
                return Ok(());
            }

            if permits.closed {
                return Err(Error::Closed);
            }

            permits = self
                .changed
                .wait(permits)
                .map_err(|_| Error::Poisoned("semaphore"))?;
        }
    }

    /// Gives one permit back and wakes one waiting thread, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Poisoned`] if the semaphore's lock was poisoned.
    pub fn release(&self) -> Result<(), Error> {
        let mut permits = self.lock()?;
        permits.count += 1;
        drop(permits);

        self.changed.notify_one();
        Ok(())
    }

    /// Closes the semaphore and wakes every waiting thread.
    ///
    /// Closing also goes through a poisoned lock: it only flips a flag.
    pub fn close(&self) {
        let mut permits = self
            .permits
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        permits.closed = true;
        drop(permits);

        self.changed.notify_all();
    }

    /// Returns the number of permits currently available.
    #[inline]
    pub fn available(&self) -> usize {
        self.permits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .count
    }

    #[inline]
    fn lock(&self) -> Result<MutexGuard<'_, Permits>, Error> {
        self.permits
            .lock()
            .map_err(|_| Error::Poisoned("semaphore"))
    }
}

/* ---------- */

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crossbeam_channel::bounded;

    use super::*;

    #[test]
    fn acquire_takes_permits() {
        let sem = Semaphore::new(2);

        sem.acquire().expect("first permit");
        sem.acquire().expect("second permit");
        assert_eq!(sem.available(), 0);
    }

    #[test]
    fn acquire_blocks_until_release() {
        let sem = Arc::new(Semaphore::new(0));
        let (done_tx, done_rx) = bounded(1);

        let waiter = {
            let sem = Arc::clone(&sem);
            std::thread::spawn(move || {
                sem.acquire().expect("permit");
                done_tx.send(()).expect("done");
            })
        };

        assert!(
            done_rx.recv_timeout(Duration::from_millis(100)).is_err(),
            "acquire shouldn't return without a permit"
        );

        sem.release().expect("release");
        done_rx
            .recv_timeout(Duration::from_secs(1))
            .expect("waiter should have been woken");
        waiter.join().expect("waiter panicked");
        assert_eq!(sem.available(), 0);
    }

    #[test]
    fn close_wakes_waiters() {
        let sem = Arc::new(Semaphore::new(0));
        let (done_tx, done_rx) = bounded(4);

        let waiters = (0..4)
            .map(|_| {
                let sem = Arc::clone(&sem);
                let done_tx = done_tx.clone();
                std::thread::spawn(move || {
                    done_tx.send(sem.acquire()).expect("done");
                })
            })
            .collect::<Vec<_>>();

        std::thread::sleep(Duration::from_millis(50));
        sem.close();

        for _ in 0..4 {
            let res = done_rx
                .recv_timeout(Duration::from_secs(1))
                .expect("waiter should have been woken");
            assert!(matches!(res, Err(Error::Closed)));
        }

        for waiter in waiters {
            waiter.join().expect("waiter panicked");
        }
    }

    #[test]
    fn closed_semaphore_still_grants_remaining_permits() {
        let sem = Semaphore::new(2);
        sem.close();

        sem.acquire().expect("first remaining permit");
        sem.acquire().expect("second remaining permit");
        assert!(matches!(sem.acquire(), Err(Error::Closed)));
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let sem = Arc::new(Semaphore::new(1));

        let poisoner = {
            let sem = Arc::clone(&sem);
            std::thread::spawn(move || {
                let _guard = sem.permits.lock().unwrap();
                panic!("poisoning the semaphore");
            })
        };
        assert!(poisoner.join().is_err());

        assert!(matches!(sem.acquire(), Err(Error::Poisoned(_))));
        assert!(matches!(sem.release(), Err(Error::Poisoned(_))));
    }
}
