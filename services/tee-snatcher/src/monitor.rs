//! Tee time polling and booking loop
//!
//! Each tick searches every configured (course, date) pair in order and
//! takes the first tee time with enough open spots. A real booking ends the
//! loop; a dry run simulates the booking and keeps polling. Errors inside a
//! tick are logged and treated as "nothing found this tick".
//!
//! Ticks never overlap: the next interval wait only starts after the current
//! tick's API calls have finished. A shutdown signal is only observed
//! between ticks, so in-flight calls always complete.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chronogolf_api::{ApiClient, Booking, BookingRequest, Page, TeeTime, TeeTimeQuery};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

use crate::config::MonitorConfig;
use crate::metrics;

/// Booking id reported for dry-run bookings.
pub const SIMULATED_BOOKING_ID: &str = "simulated-booking-id";
pub const SIMULATED_STATUS: &str = "simulated-success";

type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = chronogolf_api::Result<T>> + Send + 'a>>;

/// The two partner API calls the monitor needs.
pub trait TeeTimeApi: Send + Sync {
    fn tee_times<'a>(&'a self, course_id: &'a str, query: &'a TeeTimeQuery)
    -> ApiFuture<'a, Page<TeeTime>>;

    fn book<'a>(
        &'a self,
        course_id: &'a str,
        tee_time_id: &'a str,
        booking: &'a BookingRequest,
    ) -> ApiFuture<'a, Booking>;
}

impl TeeTimeApi for ApiClient {
    fn tee_times<'a>(
        &'a self,
        course_id: &'a str,
        query: &'a TeeTimeQuery,
    ) -> ApiFuture<'a, Page<TeeTime>> {
        Box::pin(self.get_tee_times(course_id, query))
    }

    fn book<'a>(
        &'a self,
        course_id: &'a str,
        tee_time_id: &'a str,
        booking: &'a BookingRequest,
    ) -> ApiFuture<'a, Booking> {
        Box::pin(self.book_tee_time(course_id, tee_time_id, booking))
    }
}

/// A tee time that satisfies the search criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub course_id: String,
    pub tee_time_id: String,
    /// The configured date the slot was found under
    pub date: String,
    pub time: String,
    pub available_spots: u32,
}

/// What a dry run would have booked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedBooking {
    pub id: String,
    pub course_id: String,
    pub tee_time_id: String,
    pub date: String,
    pub time: String,
    pub players: u32,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingOutcome {
    Confirmed(Booking),
    Simulated(SimulatedBooking),
}

/// Why the loop stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum MonitorExit {
    Booked(Booking),
    AttemptsExhausted { attempts: u32 },
    Cancelled { attempts: u32 },
}

pub struct Monitor {
    api: Arc<dyn TeeTimeApi>,
    settings: MonitorConfig,
    dry_run: bool,
}

impl Monitor {
    pub fn new(api: Arc<dyn TeeTimeApi>, settings: MonitorConfig, dry_run: bool) -> Self {
        Self {
            api,
            settings,
            dry_run,
        }
    }

    /// Search every (course, date) pair and return the first tee time with
    /// at least `players` open spots. Any query failure ends the search for
    /// this tick and yields `None`.
    pub async fn check_tee_times(&self) -> Option<Candidate> {
        match self.find_candidate().await {
            Ok(Some(candidate)) => {
                metrics::record_candidate();
                info!(
                    course_id = %candidate.course_id,
                    tee_time_id = %candidate.tee_time_id,
                    date = %candidate.date,
                    time = %candidate.time,
                    available_spots = candidate.available_spots,
                    "found available tee time"
                );
                Some(candidate)
            }
            Ok(None) => {
                info!("no suitable tee times found");
                None
            }
            Err(e) => {
                warn!(error = %e, "error checking tee times");
                None
            }
        }
    }

    async fn find_candidate(&self) -> chronogolf_api::Result<Option<Candidate>> {
        let settings = &self.settings;
        for course_id in &settings.courses {
            for date in &settings.dates {
                debug!(course_id = %course_id, date = %date, "checking tee times");
                let query = TeeTimeQuery {
                    date: Some(date.clone()),
                    players: Some(settings.players),
                    time_min: Some(settings.time_range.earliest.clone()),
                    time_max: Some(settings.time_range.latest.clone()),
                    per_page: Some(settings.per_page),
                    page: None,
                };

                let page = match self.api.tee_times(course_id, &query).await {
                    Ok(page) => {
                        metrics::record_query("ok");
                        page
                    }
                    Err(e) => {
                        metrics::record_query("error");
                        return Err(e);
                    }
                };

                if let Some(tee_time) = page
                    .items
                    .into_iter()
                    .find(|t| t.available_spots >= settings.players)
                {
                    return Ok(Some(Candidate {
                        course_id: course_id.clone(),
                        tee_time_id: tee_time.id,
                        date: date.clone(),
                        time: tee_time.time,
                        available_spots: tee_time.available_spots,
                    }));
                }
            }
        }
        Ok(None)
    }

    /// Book `candidate`, or simulate the booking in dry-run mode.
    ///
    /// The roster is checked before anything is sent: a booking needs at
    /// least `players` configured player records.
    pub async fn book_tee_time(
        &self,
        candidate: &Candidate,
    ) -> chronogolf_api::Result<BookingOutcome> {
        if candidate.course_id.trim().is_empty() || candidate.tee_time_id.trim().is_empty() {
            return Err(chronogolf_api::Error::Validation(
                "invalid tee time details".into(),
            ));
        }

        let settings = &self.settings;
        let required = settings.players as usize;
        if settings.player_info.len() < required {
            return Err(chronogolf_api::Error::Validation(format!(
                "not enough player information: {required} players required, {} configured",
                settings.player_info.len()
            )));
        }

        if self.dry_run {
            info!(
                course_id = %candidate.course_id,
                tee_time_id = %candidate.tee_time_id,
                date = %candidate.date,
                time = %candidate.time,
                players = settings.players,
                "dry run: simulating booking"
            );
            metrics::record_booking("simulated");
            return Ok(BookingOutcome::Simulated(SimulatedBooking {
                id: SIMULATED_BOOKING_ID.to_string(),
                course_id: candidate.course_id.clone(),
                tee_time_id: candidate.tee_time_id.clone(),
                date: candidate.date.clone(),
                time: candidate.time.clone(),
                players: settings.players,
                status: SIMULATED_STATUS.to_string(),
            }));
        }

        let request = BookingRequest {
            players: settings.players,
            player_info: settings.player_info[..required].to_vec(),
            payment_token: settings.payment_token.expose().clone(),
        };

        info!(
            course_id = %candidate.course_id,
            tee_time_id = %candidate.tee_time_id,
            "booking tee time"
        );
        match self
            .api
            .book(&candidate.course_id, &candidate.tee_time_id, &request)
            .await
        {
            Ok(booking) => {
                metrics::record_booking("confirmed");
                info!(booking_id = ?booking.id, status = ?booking.status, "successfully booked tee time");
                Ok(BookingOutcome::Confirmed(booking))
            }
            Err(e) => {
                metrics::record_booking(if e.status().is_some() {
                    "rejected"
                } else {
                    "error"
                });
                Err(e)
            }
        }
    }

    /// One polling tick: search, then book the first candidate found.
    pub async fn run_tick(&self) -> Option<BookingOutcome> {
        let candidate = self.check_tee_times().await?;
        match self.book_tee_time(&candidate).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(error = %e, "failed to book tee time");
                None
            }
        }
    }

    /// Poll every `check_interval_ms` until a real booking succeeds,
    /// `max_attempts` checks have run, or `shutdown` resolves.
    ///
    /// The first check runs one interval after start.
    #[instrument(
        name = "monitor",
        skip_all,
        fields(run_id = %uuid::Uuid::new_v4(), dry_run = self.dry_run)
    )]
    pub async fn run<F>(&self, shutdown: F) -> MonitorExit
    where
        F: Future<Output = ()>,
    {
        let settings = &self.settings;
        info!(
            check_interval_ms = settings.check_interval_ms,
            max_attempts = settings.max_attempts,
            courses = settings.courses.len(),
            dates = settings.dates.len(),
            "starting tee time monitoring"
        );
        if self.dry_run {
            warn!("dry run mode: bookings will be simulated");
        }

        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(settings.check_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        ticker.tick().await;

        let mut attempts = 0u32;
        loop {
            if attempts >= settings.max_attempts {
                info!(attempts, "maximum attempts reached, stopping monitor");
                return MonitorExit::AttemptsExhausted { attempts };
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!(attempts, "monitoring stopped");
                    return MonitorExit::Cancelled { attempts };
                }
                _ = ticker.tick() => {}
            }

            attempts += 1;
            metrics::record_check();
            info!(
                attempt = attempts,
                max_attempts = settings.max_attempts,
                "checking for available tee times"
            );

            match self.run_tick().await {
                Some(BookingOutcome::Confirmed(booking)) => {
                    info!(attempts, "booking confirmed, stopping monitor");
                    return MonitorExit::Booked(booking);
                }
                Some(BookingOutcome::Simulated(simulated)) => {
                    info!(
                        booking_id = %simulated.id,
                        status = %simulated.status,
                        course_id = %simulated.course_id,
                        tee_time_id = %simulated.tee_time_id,
                        date = %simulated.date,
                        time = %simulated.time,
                        players = simulated.players,
                        "dry run booking simulated, continuing to monitor"
                    );
                }
                None => {}
            }
        }
    }
}
