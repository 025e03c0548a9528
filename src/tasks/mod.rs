//! Background scheduled tasks for the application.
//!
//! This module centralizes all recurring background jobs (raffle lifecycle
//! sweeps, raffle supply maintenance, and boost expiration). Call `spawn_all`
//! once during startup to launch them.

use crate::config::SchedulerConfig;
use crate::services::{BoostService, RaffleService};

/// Spawn all background tasks.
///
/// Notes
/// - Each sweep runs on its own cadence and tolerates partial failure: one
///   raffle's failed draw never blocks the rest of the sweep.
/// - This function detaches tasks via `tokio::spawn`; it does not block.
pub fn spawn_all(
    raffle_service: RaffleService,
    boost_service: BoostService,
    config: SchedulerConfig,
) {
    // 生命周期扫描: 激活到点活动 + 到期开奖 (含 drawing 态恢复)
    {
        let svc = raffle_service.clone();
        let interval = config.lifecycle_interval_secs;
        tokio::spawn(async move {
            loop {
                match svc.activate_due().await {
                    Ok(n) if n > 0 => log::info!("Raffles activated: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to activate due raffles: {e:?}"),
                }

                match svc.due_draw_ids().await {
                    Ok(ids) => {
                        for raffle_id in ids {
                            // loop-and-continue: 单个活动失败不阻塞同批其它活动
                            match svc.execute_draw(raffle_id).await {
                                Ok(result) => log::info!(
                                    "Scheduled draw completed for raffle {raffle_id}: {} winner(s)",
                                    result.winners.len()
                                ),
                                Err(e) => log::error!(
                                    "Scheduled draw failed for raffle {raffle_id}: {e:?}"
                                ),
                            }
                        }
                    }
                    Err(e) => log::error!("Failed to scan due raffles: {e:?}"),
                }

                tokio::time::sleep(std::time::Duration::from_secs(interval)).await;
            }
        });
    }

    // 供给扫描: 维持最低在售活动数
    {
        let svc = raffle_service.clone();
        let interval = config.supply_interval_secs;
        let min_open = config.min_open_raffles;
        tokio::spawn(async move {
            loop {
                match svc.maintain_supply(min_open).await {
                    Ok(n) if n > 0 => log::info!("Raffles created to maintain supply: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to maintain raffle supply: {e:?}"),
                }
                tokio::time::sleep(std::time::Duration::from_secs(interval)).await;
            }
        });
    }

    // boost 过期扫描
    {
        let svc = boost_service.clone();
        let interval = config.boost_interval_secs;
        tokio::spawn(async move {
            loop {
                match svc.expire_boosts().await {
                    Ok(n) if n > 0 => log::info!("Expired boosts deactivated: {n}"),
                    Ok(_) => {}
                    Err(e) => log::error!("Failed to expire boosts: {e:?}"),
                }
                tokio::time::sleep(std::time::Duration::from_secs(interval)).await;
            }
        });
    }
}
