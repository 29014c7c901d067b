// Z-score calculation with volume-weighted rate stats.

use crate::config::{CategoryWeights, Config, PoolConfig};
use crate::draft::pick::Position;
use crate::valuation::projections::{AllProjections, HitterProjection, PitcherProjection, PitcherType};

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a single statistical category across a player pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the population standard deviation (N denominator), since the pool
/// represents the full relevant player universe rather than a sample.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is approximately zero (guarding
/// against division by zero).
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

// ---------------------------------------------------------------------------
// Rate stat contribution functions (volume-weighted)
// ---------------------------------------------------------------------------

/// ERA contribution: `IP * (league_avg_ERA - player_ERA) / 9`
///
/// A pitcher with ERA below league average produces a positive contribution.
pub fn era_contribution(ip: f64, era: f64, league_avg_era: f64) -> f64 {
    ip * (league_avg_era - era) / 9.0
}

/// WHIP contribution: `IP * (league_avg_WHIP - player_WHIP)`
///
/// A pitcher with WHIP below league average produces a positive contribution.
pub fn whip_contribution(ip: f64, whip: f64, league_avg_whip: f64) -> f64 {
    ip * (league_avg_whip - whip)
}

/// AVG contribution: `AB * (player_AVG - league_avg_AVG)`
///
/// A hitter with AVG above league average produces a positive contribution.
pub fn avg_contribution(ab: u32, avg: f64, league_avg_avg: f64) -> f64 {
    (ab as f64) * (avg - league_avg_avg)
}

// ---------------------------------------------------------------------------
// Per-category z-score structs
// ---------------------------------------------------------------------------

/// Per-category z-scores for a hitter.
#[derive(Debug, Clone, Copy)]
pub struct HitterZScores {
    pub r: f64,
    pub hr: f64,
    pub rbi: f64,
    pub bb: f64,
    pub sb: f64,
    pub avg: f64,
    pub total: f64,
}

/// Per-category z-scores for a pitcher.
#[derive(Debug, Clone, Copy)]
pub struct PitcherZScores {
    pub k: f64,
    pub w: f64,
    pub sv: f64,
    pub hd: f64,
    pub era: f64,
    pub whip: f64,
    pub total: f64,
}

/// Enum wrapper for hitter or pitcher z-scores.
#[derive(Debug, Clone, Copy)]
pub enum CategoryZScores {
    Hitter(HitterZScores),
    Pitcher(PitcherZScores),
}

// ---------------------------------------------------------------------------
// Pool stats structs
// ---------------------------------------------------------------------------

/// Aggregated pool statistics for all hitter categories.
#[derive(Debug, Clone)]
pub struct HitterPoolStats {
    pub r: PoolStats,
    pub hr: PoolStats,
    pub rbi: PoolStats,
    pub bb: PoolStats,
    pub sb: PoolStats,
    pub avg_contribution: PoolStats,
}

/// Aggregated pool statistics for all pitcher categories.
#[derive(Debug, Clone)]
pub struct PitcherPoolStats {
    pub k: PoolStats,
    pub w: PoolStats,
    pub sv: PoolStats,
    pub hd: PoolStats,
    pub era_contribution: PoolStats,
    pub whip_contribution: PoolStats,
}

// ---------------------------------------------------------------------------
// Projection data enum (carried through the pipeline)
// ---------------------------------------------------------------------------

/// Raw projection numbers carried forward through the valuation pipeline.
#[derive(Debug, Clone)]
pub enum PlayerProjectionData {
    Hitter {
        pa: u32,
        ab: u32,
        h: u32,
        hr: u32,
        r: u32,
        rbi: u32,
        bb: u32,
        sb: u32,
        avg: f64,
    },
    Pitcher {
        ip: f64,
        k: u32,
        w: u32,
        sv: u32,
        hd: u32,
        era: f64,
        whip: f64,
        g: u32,
        gs: u32,
    },
}

// ---------------------------------------------------------------------------
// Player valuation (main output struct)
// ---------------------------------------------------------------------------

/// A player carried through the full valuation pipeline.
///
/// Fields `vor`, `best_position`, and `dollar_value` are initialized
/// to defaults here and filled by subsequent pipeline stages (Tasks 06/07).
#[derive(Debug, Clone)]
pub struct PlayerValuation {
    pub name: String,
    pub team: String,
    pub positions: Vec<Position>,
    pub is_pitcher: bool,
    pub pitcher_type: Option<PitcherType>,
    pub projection: PlayerProjectionData,
    pub total_zscore: f64,
    pub category_zscores: CategoryZScores,
    pub vor: f64,
    pub best_position: Option<Position>,
    pub dollar_value: f64,
    pub adp: Option<f64>,
}

// ---------------------------------------------------------------------------
// Pool filtering
// ---------------------------------------------------------------------------

/// Filter hitters by minimum PA and return the top N by PA.
pub fn filter_hitter_pool<'a>(hitters: &'a [HitterProjection], pool: &PoolConfig) -> Vec<&'a HitterProjection> {
    let mut qualified: Vec<&HitterProjection> = hitters
        .iter()
        .filter(|h| h.pa >= pool.min_pa as u32)
        .collect();
    // Sort descending by PA to take top N
    qualified.sort_by(|a, b| b.pa.cmp(&a.pa));
    qualified.truncate(pool.hitter_pool_size);
    qualified
}

/// Filter starting pitchers by minimum IP and return the top N by IP.
pub fn filter_sp_pool<'a>(pitchers: &'a [PitcherProjection], pool: &PoolConfig) -> Vec<&'a PitcherProjection> {
    let mut qualified: Vec<&PitcherProjection> = pitchers
        .iter()
        .filter(|p| p.pitcher_type == PitcherType::SP && p.ip >= pool.min_ip_sp)
        .collect();
    qualified.sort_by(|a, b| b.ip.partial_cmp(&a.ip).unwrap_or(std::cmp::Ordering::Equal));
    qualified.truncate(pool.sp_pool_size);
    qualified
}

/// Filter relief pitchers by minimum games and return the top N by G.
pub fn filter_rp_pool<'a>(pitchers: &'a [PitcherProjection], pool: &PoolConfig) -> Vec<&'a PitcherProjection> {
    let mut qualified: Vec<&PitcherProjection> = pitchers
        .iter()
        .filter(|p| p.pitcher_type == PitcherType::RP && p.g >= pool.min_g_rp as u32)
        .collect();
    qualified.sort_by(|a, b| b.g.cmp(&a.g));
    qualified.truncate(pool.rp_pool_size);
    qualified
}

// ---------------------------------------------------------------------------
// Pool stats computation
// ---------------------------------------------------------------------------

/// Compute league-average rate stats from the hitter pool.
/// Returns (league_avg_avg,).
fn compute_league_avg_hitter(pool: &[&HitterProjection]) -> f64 {
    if pool.is_empty() {
        return 0.0;
    }
    let total_h: u32 = pool.iter().map(|h| h.h).sum();
    let total_ab: u32 = pool.iter().map(|h| h.ab).sum();
    if total_ab == 0 {
        return 0.0;
    }
    total_h as f64 / total_ab as f64
}

/// Compute league-average ERA and WHIP from a pitcher pool.
/// Returns (league_avg_era, league_avg_whip).
fn compute_league_avg_pitcher(pool: &[&PitcherProjection]) -> (f64, f64) {
    if pool.is_empty() {
        return (0.0, 0.0);
    }
    let total_ip: f64 = pool.iter().map(|p| p.ip).sum();
    if total_ip < STDEV_EPSILON {
        return (0.0, 0.0);
    }
    // ERA = (total earned runs) / (total IP) * 9
    // earned runs per pitcher = IP * ERA / 9
    let total_er: f64 = pool.iter().map(|p| p.ip * p.era / 9.0).sum();
    let league_era = total_er / total_ip * 9.0;

    // WHIP = (total walks + hits) / (total IP)
    // walks + hits per pitcher = IP * WHIP
    let total_wh: f64 = pool.iter().map(|p| p.ip * p.whip).sum();
    let league_whip = total_wh / total_ip;

    (league_era, league_whip)
}

/// Compute per-category pool stats for hitters in the given pool.
pub fn compute_hitter_pool_stats(
    pool: &[&HitterProjection],
    league_avg_avg: f64,
) -> HitterPoolStats {
    let r_vals: Vec<f64> = pool.iter().map(|h| h.r as f64).collect();
    let hr_vals: Vec<f64> = pool.iter().map(|h| h.hr as f64).collect();
    let rbi_vals: Vec<f64> = pool.iter().map(|h| h.rbi as f64).collect();
    let bb_vals: Vec<f64> = pool.iter().map(|h| h.bb as f64).collect();
    let sb_vals: Vec<f64> = pool.iter().map(|h| h.sb as f64).collect();
    let avg_contrib_vals: Vec<f64> = pool
        .iter()
        .map(|h| avg_contribution(h.ab, h.avg, league_avg_avg))
        .collect();

    HitterPoolStats {
        r: compute_pool_stats(&r_vals),
        hr: compute_pool_stats(&hr_vals),
        rbi: compute_pool_stats(&rbi_vals),
        bb: compute_pool_stats(&bb_vals),
        sb: compute_pool_stats(&sb_vals),
        avg_contribution: compute_pool_stats(&avg_contrib_vals),
    }
}

/// Compute per-category pool stats for pitchers in a combined SP+RP pool.
pub fn compute_pitcher_pool_stats(
    pool: &[&PitcherProjection],
    league_avg_era: f64,
    league_avg_whip: f64,
) -> PitcherPoolStats {
    let k_vals: Vec<f64> = pool.iter().map(|p| p.k as f64).collect();
    let w_vals: Vec<f64> = pool.iter().map(|p| p.w as f64).collect();
    let sv_vals: Vec<f64> = pool.iter().map(|p| p.sv as f64).collect();
    let hd_vals: Vec<f64> = pool.iter().map(|p| p.hd as f64).collect();
    let era_contrib_vals: Vec<f64> = pool
        .iter()
        .map(|p| era_contribution(p.ip, p.era, league_avg_era))
        .collect();
    let whip_contrib_vals: Vec<f64> = pool
        .iter()
        .map(|p| whip_contribution(p.ip, p.whip, league_avg_whip))
        .collect();

    PitcherPoolStats {
        k: compute_pool_stats(&k_vals),
        w: compute_pool_stats(&w_vals),
        sv: compute_pool_stats(&sv_vals),
        hd: compute_pool_stats(&hd_vals),
        era_contribution: compute_pool_stats(&era_contrib_vals),
        whip_contribution: compute_pool_stats(&whip_contrib_vals),
    }
}

// ---------------------------------------------------------------------------
// Z-score computation for individual players
// ---------------------------------------------------------------------------

fn compute_hitter_zscores(
    hitter: &HitterProjection,
    stats: &HitterPoolStats,
    league_avg_avg: f64,
    weights: &CategoryWeights,
) -> HitterZScores {
    let r = compute_zscore(hitter.r as f64, &stats.r);
    let hr = compute_zscore(hitter.hr as f64, &stats.hr);
    let rbi = compute_zscore(hitter.rbi as f64, &stats.rbi);
    let bb = compute_zscore(hitter.bb as f64, &stats.bb);
    let sb = compute_zscore(hitter.sb as f64, &stats.sb);
    let avg = compute_zscore(
        avg_contribution(hitter.ab, hitter.avg, league_avg_avg),
        &stats.avg_contribution,
    );

    let total = r * weights.R
        + hr * weights.HR
        + rbi * weights.RBI
        + bb * weights.BB
        + sb * weights.SB
        + avg * weights.AVG;

    HitterZScores {
        r,
        hr,
        rbi,
        bb,
        sb,
        avg,
        total,
    }
}

fn compute_pitcher_zscores(
    pitcher: &PitcherProjection,
    stats: &PitcherPoolStats,
    league_avg_era: f64,
    league_avg_whip: f64,
    weights: &CategoryWeights,
) -> PitcherZScores {
    let k = compute_zscore(pitcher.k as f64, &stats.k);
    let w = compute_zscore(pitcher.w as f64, &stats.w);
    let sv = compute_zscore(pitcher.sv as f64, &stats.sv);
    let hd = compute_zscore(pitcher.hd as f64, &stats.hd);
    let era = compute_zscore(
        era_contribution(pitcher.ip, pitcher.era, league_avg_era),
        &stats.era_contribution,
    );
    let whip = compute_zscore(
        whip_contribution(pitcher.ip, pitcher.whip, league_avg_whip),
        &stats.whip_contribution,
    );

    let total = k * weights.K
        + w * weights.W
        + sv * weights.SV
        + hd * weights.HD
        + era * weights.ERA
        + whip * weights.WHIP;

    PitcherZScores {
        k,
        w,
        sv,
        hd,
        era,
        whip,
        total,
    }
}

// ---------------------------------------------------------------------------
// Top-level entry point
// ---------------------------------------------------------------------------

/// Compute initial z-scores for all players, returning a `Vec<PlayerValuation>`
/// sorted descending by total z-score.
///
/// Steps:
/// 1. Filter hitter/SP/RP pools according to config thresholds.
/// 2. Compute league averages for rate stats from the filtered pools.
/// 3. Compute per-category pool stats (using volume-weighted contributions
///    for AVG, ERA, WHIP).
/// 4. Score every player (including those below the pool threshold) against
///    the pool stats.
/// 5. Apply category weights and sum to a total z-score.
///
/// Fields `vor`, `best_position`, and `dollar_value` are left at defaults
/// for downstream pipeline stages.
pub fn compute_initial_zscores(
    projections: &AllProjections,
    config: &Config,
) -> Vec<PlayerValuation> {
    let pool_cfg = &config.strategy.pool;
    let weights = &config.strategy.weights;

    // ---- 1. Filter pools ----
    let hitter_pool = filter_hitter_pool(&projections.hitters, pool_cfg);
    let sp_pool = filter_sp_pool(&projections.pitchers, pool_cfg);
    let rp_pool = filter_rp_pool(&projections.pitchers, pool_cfg);

    // Combined pitcher pool for shared stats
    let pitcher_pool: Vec<&PitcherProjection> = sp_pool
        .iter()
        .chain(rp_pool.iter())
        .copied()
        .collect();

    // ---- 2. League averages for rate stats ----
    let league_avg_avg = compute_league_avg_hitter(&hitter_pool);
    let (league_avg_era, league_avg_whip) = compute_league_avg_pitcher(&pitcher_pool);

    // ---- 3. Pool stats ----
    let hitter_stats = compute_hitter_pool_stats(&hitter_pool, league_avg_avg);
    let pitcher_stats = compute_pitcher_pool_stats(&pitcher_pool, league_avg_era, league_avg_whip);

    // ---- 4+5. Score all players ----
    let mut valuations: Vec<PlayerValuation> = Vec::with_capacity(
        projections.hitters.len() + projections.pitchers.len(),
    );

    for hitter in &projections.hitters {
        let zscores = compute_hitter_zscores(hitter, &hitter_stats, league_avg_avg, weights);
        valuations.push(PlayerValuation {
            name: hitter.name.clone(),
            team: hitter.team.clone(),
            positions: Vec::new(), // Populated from ESPN roster data overlay
            is_pitcher: false,
            pitcher_type: None,
            projection: PlayerProjectionData::Hitter {
                pa: hitter.pa,
                ab: hitter.ab,
                h: hitter.h,
                hr: hitter.hr,
                r: hitter.r,
                rbi: hitter.rbi,
                bb: hitter.bb,
                sb: hitter.sb,
                avg: hitter.avg,
            },
            total_zscore: zscores.total,
            category_zscores: CategoryZScores::Hitter(zscores),
            vor: 0.0,
            best_position: None,
            dollar_value: 0.0,
            adp: projections.adp.get(&hitter.name).copied(),
        });
    }

    for pitcher in &projections.pitchers {
        let zscores = compute_pitcher_zscores(
            pitcher,
            &pitcher_stats,
            league_avg_era,
            league_avg_whip,
            weights,
        );
        valuations.push(PlayerValuation {
            name: pitcher.name.clone(),
            team: pitcher.team.clone(),
            positions: Vec::new(),
            is_pitcher: true,
            pitcher_type: Some(pitcher.pitcher_type),
            projection: PlayerProjectionData::Pitcher {
                ip: pitcher.ip,
                k: pitcher.k,
                w: pitcher.w,
                sv: pitcher.sv,
                hd: pitcher.hd,
                era: pitcher.era,
                whip: pitcher.whip,
                g: pitcher.g,
                gs: pitcher.gs,
            },
            total_zscore: zscores.total,
            category_zscores: CategoryZScores::Pitcher(zscores),
            vor: 0.0,
            best_position: None,
            dollar_value: 0.0,
            adp: projections.adp.get(&pitcher.name).copied(),
        });
    }

    // Sort descending by total z-score
    valuations.sort_by(|a, b| {
        b.total_zscore
            .partial_cmp(&a.total_zscore)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    valuations
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
