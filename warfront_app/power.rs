//! Player power with a per-player read-through cache.
//!
//! Power only drives PvP cost and reward scaling, so a stale value is an
//! acceptable degraded mode. Jobs that change a player's cities mark the
//! player in a [`StalePower`] set; the worker drops those entries once the
//! transaction has committed.
use std::{
    collections::{BTreeSet, HashMap},
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing::{debug, error, warn};
use uuid::Uuid;

use warfront_game::{
    balance::PvpBalance,
    pvp::{PowerBreakdown, calculate_player_power},
};
use warfront_types::errors::{AppError, ApplicationError};

use crate::{config::Config, uow::UnitOfWork};

/// Players whose cached power is out of date once the open transaction
/// commits.
#[derive(Debug, Default)]
pub struct StalePower {
    players: Mutex<BTreeSet<Uuid>>,
}

impl StalePower {
    pub fn mark(&self, player_ids: &[Uuid]) {
        self.players
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend(player_ids.iter().copied());
    }

    /// Drains the set.
    pub fn take(&self) -> Vec<Uuid> {
        std::mem::take(
            &mut *self
                .players
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        )
        .into_iter()
        .collect()
    }

    pub fn contains(&self, player_id: Uuid) -> bool {
        self.players
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(&player_id)
    }
}

#[derive(Debug, Clone, Copy)]
struct CachedPower {
    power: u64,
    cached_at: Instant,
}

pub struct PlayerPowerService {
    ttl: Duration,
    balance: PvpBalance,
    cache: Mutex<HashMap<Uuid, CachedPower>>,
}

impl PlayerPowerService {
    pub fn new(ttl: Duration, balance: PvpBalance) -> Self {
        Self {
            ttl,
            balance,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_secs(config.power_cache_ttl_secs),
            config.balance.pvp.clone(),
        )
    }

    /// Total power of a player, served from cache while fresh.
    pub async fn get_player_power(
        &self,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        player_id: Uuid,
        force_refresh: bool,
    ) -> Result<u64, ApplicationError> {
        if !force_refresh {
            if let Some(power) = self.cached(player_id) {
                debug!(%player_id, power, "Player power cache hit");
                return Ok(power);
            }
        }
        Ok(self.power_breakdown(uow, player_id).await?.total)
    }

    /// Recomputes the breakdown from the player's cities and refreshes the
    /// cached total.
    pub async fn power_breakdown(
        &self,
        uow: &Box<dyn UnitOfWork<'_> + '_>,
        player_id: Uuid,
    ) -> Result<PowerBreakdown, ApplicationError> {
        let cities = uow.cities().list_by_player_id(player_id).await?;
        let breakdown = calculate_player_power(&cities, &self.balance);
        self.store(player_id, breakdown.total);
        Ok(breakdown)
    }

    pub fn invalidate(&self, player_id: Uuid) -> Result<(), ApplicationError> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|e| AppError::PowerCache(e.to_string()))?;
        cache.remove(&player_id);
        Ok(())
    }

    /// Drops cached power for every given player. A failure only leaves stale
    /// power behind, so it is logged and swallowed.
    pub fn invalidate_all(&self, player_ids: &[Uuid]) {
        for player_id in player_ids {
            if let Err(e) = self.invalidate(*player_id) {
                error!(%player_id, error = %e, "Failed to invalidate player power cache");
            }
        }
    }

    pub fn clear(&self) -> Result<(), ApplicationError> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|e| AppError::PowerCache(e.to_string()))?;
        cache.clear();
        Ok(())
    }

    fn cached(&self, player_id: Uuid) -> Option<u64> {
        let cache = self.cache.lock().ok()?;
        cache
            .get(&player_id)
            .filter(|entry| entry.cached_at.elapsed() < self.ttl)
            .map(|entry| entry.power)
    }

    fn store(&self, player_id: Uuid, power: u64) {
        match self.cache.lock() {
            Ok(mut cache) => {
                cache.insert(
                    player_id,
                    CachedPower {
                        power,
                        cached_at: Instant::now(),
                    },
                );
            }
            Err(e) => warn!(%player_id, error = %e, "Player power cache unavailable"),
        }
    }
}
