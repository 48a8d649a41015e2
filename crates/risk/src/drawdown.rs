use serde::{Deserialize, Serialize};

/// One decline from a running peak, and its recovery if there was one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownEpisode {
    /// Index of the peak the decline started from.
    pub start_index: usize,
    pub trough_index: usize,
    /// First index at which the series regained the peak.
    pub end_index: Option<usize>,
    /// Peak-to-trough decline in percent of the peak.
    pub depth_pct: f64,
    /// Steps from the peak to the recovery, or to the end of the series.
    pub duration: usize,
    pub recovered: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownAnalysis {
    pub max_drawdown_pct: f64,
    /// Decline of the last value below the running peak.
    pub current_drawdown_pct: f64,
    /// Length of the unresolved drawdown at the end of the series, 0 if none.
    pub current_drawdown_duration: usize,
    /// Steps from the deepest trough back to its peak value; `None` if the
    /// deepest drawdown never recovered or there was none.
    pub time_to_recovery: Option<usize>,
    pub average_drawdown_pct: f64,
    /// Net change over the series divided by the max drawdown; 0 without drawdown.
    pub recovery_factor: f64,
    pub episodes: Vec<DrawdownEpisode>,
}

fn decline_pct(peak: f64, value: f64) -> f64 {
    if peak > 0.0 {
        ((peak - value) / peak * 100.0).max(0.0)
    } else {
        0.0
    }
}

/// Running-peak drawdown analysis.
pub fn calculate_drawdown(values: &[f64]) -> DrawdownAnalysis {
    let mut episodes: Vec<DrawdownEpisode> = Vec::new();
    let mut open: Option<DrawdownEpisode> = None;

    let Some(&first) = values.first() else {
        return DrawdownAnalysis {
            max_drawdown_pct: 0.0,
            current_drawdown_pct: 0.0,
            current_drawdown_duration: 0,
            time_to_recovery: None,
            average_drawdown_pct: 0.0,
            recovery_factor: 0.0,
            episodes,
        };
    };

    let mut peak = first;
    let mut peak_index = 0;

    for (i, &value) in values.iter().enumerate().skip(1) {
        if value >= peak {
            if let Some(mut episode) = open.take() {
                episode.end_index = Some(i);
                episode.duration = i - episode.start_index;
                episode.recovered = true;
                episodes.push(episode);
            }
            peak = value;
            peak_index = i;
            continue;
        }

        let depth = decline_pct(peak, value);
        match open.as_mut() {
            Some(episode) => {
                if depth > episode.depth_pct {
                    episode.depth_pct = depth;
                    episode.trough_index = i;
                }
            }
            None => {
                open = Some(DrawdownEpisode {
                    start_index: peak_index,
                    trough_index: i,
                    end_index: None,
                    depth_pct: depth,
                    duration: 0,
                    recovered: false,
                });
            }
        }
    }

    let last_index = values.len() - 1;
    let mut current_drawdown_duration = 0;
    if let Some(mut episode) = open.take() {
        episode.duration = last_index - episode.start_index;
        current_drawdown_duration = episode.duration;
        episodes.push(episode);
    }

    let deepest = episodes
        .iter()
        .filter(|e| e.depth_pct > 0.0)
        .fold(None::<&DrawdownEpisode>, |best, e| match best {
            Some(b) if b.depth_pct >= e.depth_pct => Some(b),
            _ => Some(e),
        });

    let max_drawdown_pct = deepest.map(|e| e.depth_pct).unwrap_or(0.0);
    let time_to_recovery = deepest.and_then(|e| e.end_index.map(|end| end - e.trough_index));

    let depths: Vec<f64> = episodes.iter().map(|e| e.depth_pct).collect();
    let net_change_pct = if first != 0.0 {
        (values[last_index] - first) / first.abs() * 100.0
    } else {
        0.0
    };
    let recovery_factor = if max_drawdown_pct > 0.0 {
        net_change_pct / max_drawdown_pct
    } else {
        0.0
    };

    DrawdownAnalysis {
        max_drawdown_pct,
        current_drawdown_pct: decline_pct(peak, values[last_index]),
        current_drawdown_duration,
        time_to_recovery,
        average_drawdown_pct: stats::mean(&depths),
        recovery_factor,
        episodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn deepest_episode_wins() {
        let d = calculate_drawdown(&[100.0, 90.0, 80.0, 95.0, 100.0, 70.0, 110.0]);
        assert_abs_diff_eq!(d.max_drawdown_pct, 30.0);
        assert_eq!(d.episodes.len(), 2);
        assert!(d.episodes.iter().all(|e| e.recovered));

        let first = &d.episodes[0];
        assert_eq!((first.start_index, first.trough_index, first.end_index), (0, 2, Some(4)));
        assert_abs_diff_eq!(first.depth_pct, 20.0);
        assert_eq!(first.duration, 4);

        assert_eq!(d.time_to_recovery, Some(1));
        assert_eq!(d.current_drawdown_pct, 0.0);
        assert_eq!(d.current_drawdown_duration, 0);
        assert_abs_diff_eq!(d.average_drawdown_pct, 25.0);
        assert_abs_diff_eq!(d.recovery_factor, 10.0 / 30.0);
    }

    #[test]
    fn unresolved_drawdown_is_current() {
        let d = calculate_drawdown(&[50.0, 60.0, 54.0, 48.0, 51.0]);
        assert_abs_diff_eq!(d.max_drawdown_pct, 20.0);
        assert_eq!(d.time_to_recovery, None);
        assert_eq!(d.current_drawdown_duration, 3);
        assert_abs_diff_eq!(d.current_drawdown_pct, 15.0);
        assert!(!d.episodes[0].recovered);
    }

    #[test]
    fn monotone_rise_has_no_drawdown() {
        let d = calculate_drawdown(&[1.0, 2.0, 3.0]);
        assert_eq!(d.max_drawdown_pct, 0.0);
        assert!(d.episodes.is_empty());
        assert_eq!(d.recovery_factor, 0.0);
        assert_eq!(d.time_to_recovery, None);
    }

    #[test]
    fn empty_and_single_point() {
        assert_eq!(calculate_drawdown(&[]).max_drawdown_pct, 0.0);
        let d = calculate_drawdown(&[42.0]);
        assert_eq!(d.current_drawdown_pct, 0.0);
        assert!(d.episodes.is_empty());
    }
}
