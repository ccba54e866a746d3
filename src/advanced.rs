use serde::Serialize;

use crate::state::PlayerStatLine;

/// Free-throw weight in the possession-usage approximation.
pub const USG_FTA_WEIGHT: f64 = 0.44;

/// Secondary columns layered on a box-score row. Never stored; rebuilt from
/// the canonical rows on every call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedStatLine {
    #[serde(flatten)]
    pub base: PlayerStatLine,
    #[serde(rename = "PRA")]
    pub pra: u32,
    #[serde(rename = "PR")]
    pub pr: u32,
    #[serde(rename = "PA")]
    pub pa: u32,
    #[serde(rename = "RA")]
    pub ra: u32,
    #[serde(rename = "STOCKS")]
    pub stocks: u32,
    /// `FGA + 0.44*FTA + TO`; not the official usage rate.
    #[serde(rename = "USG_PROXY")]
    pub usg_proxy: f64,
    #[serde(rename = "FG%")]
    pub fg_pct: f64,
    #[serde(rename = "3P%")]
    pub fg3_pct: f64,
    #[serde(rename = "FT%")]
    pub ft_pct: f64,
    #[serde(rename = "PTS_PER_FGA")]
    pub pts_per_fga: f64,
    #[serde(rename = "PTS_PER_USG")]
    pub pts_per_usg: f64,
}

pub fn compute_advanced(rows: &[PlayerStatLine]) -> Vec<AdvancedStatLine> {
    rows.iter().map(advanced_line).collect()
}

pub fn advanced_line(row: &PlayerStatLine) -> AdvancedStatLine {
    let pts = f64::from(row.pts);
    let fga = f64::from(row.fga);
    let usg_proxy = usage_proxy(row);

    AdvancedStatLine {
        base: row.clone(),
        pra: row.pts.saturating_add(row.reb).saturating_add(row.ast),
        pr: row.pts.saturating_add(row.reb),
        pa: row.pts.saturating_add(row.ast),
        ra: row.reb.saturating_add(row.ast),
        stocks: row.stl.saturating_add(row.blk),
        usg_proxy,
        fg_pct: safe_div(f64::from(row.fgm), fga),
        fg3_pct: safe_div(f64::from(row.fg3m), f64::from(row.fg3a)),
        ft_pct: safe_div(f64::from(row.ftm), f64::from(row.fta)),
        pts_per_fga: safe_div(pts, fga),
        pts_per_usg: safe_div(pts, usg_proxy),
    }
}

pub fn usage_proxy(row: &PlayerStatLine) -> f64 {
    f64::from(row.fga) + USG_FTA_WEIGHT * f64::from(row.fta) + f64::from(row.tov)
}

/// Division that reports 0.0 for a zero (or non-positive) denominator.
pub fn safe_div(num: f64, den: f64) -> f64 {
    if den > 0.0 { num / den } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(pts: u32, fgm: u32, fga: u32, fta: u32, tov: u32) -> PlayerStatLine {
        PlayerStatLine {
            name: "P".to_string(),
            pts,
            fgm,
            fga,
            fta,
            tov,
            ..PlayerStatLine::default()
        }
    }

    #[test]
    fn percentages_are_zero_without_attempts() {
        let adv = advanced_line(&line(0, 0, 0, 0, 0));
        assert_eq!(adv.fg_pct, 0.0);
        assert_eq!(adv.fg3_pct, 0.0);
        assert_eq!(adv.ft_pct, 0.0);
        assert_eq!(adv.usg_proxy, 0.0);
        assert_eq!(adv.pts_per_fga, 0.0);
        assert_eq!(adv.pts_per_usg, 0.0);
    }

    #[test]
    fn partial_rows_fill_missing_columns_with_zero() {
        let rows: Vec<PlayerStatLine> =
            serde_json::from_str(r#"[{"name":"A","PTS":10}]"#).expect("partial row");
        let row = &rows[0];
        assert_eq!(row.pts, 10);
        assert_eq!((row.fgm, row.fga, row.fg3m, row.fg3a, row.ftm, row.fta), (0, 0, 0, 0, 0, 0));
        assert_eq!((row.reb, row.ast, row.stl, row.blk, row.tov), (0, 0, 0, 0, 0));
        assert_eq!(row.minutes, 0.0);

        let adv = compute_advanced(&rows);
        assert_eq!(adv.len(), 1);
        let adv = &adv[0];
        assert_eq!((adv.pra, adv.pr, adv.pa, adv.ra, adv.stocks), (10, 10, 10, 0, 0));
        assert_eq!(adv.usg_proxy, 0.0);
        assert_eq!(adv.fg_pct, 0.0);
        assert_eq!(adv.fg3_pct, 0.0);
        assert_eq!(adv.ft_pct, 0.0);
        assert_eq!(adv.pts_per_fga, 0.0);
        assert_eq!(adv.pts_per_usg, 0.0);
    }

    #[test]
    fn free_throw_only_scorer_has_usage_but_no_fg_rate() {
        let mut row = line(4, 0, 0, 5, 0);
        row.ftm = 4;
        let adv = advanced_line(&row);
        assert_eq!(adv.pts_per_fga, 0.0);
        assert!((adv.usg_proxy - 2.2).abs() < 1e-9);
        assert!((adv.pts_per_usg - 4.0 / 2.2).abs() < 1e-9);
        assert!((adv.ft_pct - 0.8).abs() < 1e-9);
    }

    #[test]
    fn usage_proxy_weights_free_throws() {
        let adv = advanced_line(&line(25, 9, 18, 8, 3));
        assert!((adv.usg_proxy - (18.0 + 0.44 * 8.0 + 3.0)).abs() < 1e-9);
        assert!((adv.fg_pct - 0.5).abs() < 1e-9);
        assert!((adv.pts_per_fga - 25.0 / 18.0).abs() < 1e-9);
    }

    #[test]
    fn combo_columns_sum_box_score() {
        let row = PlayerStatLine {
            pts: 20,
            reb: 8,
            ast: 6,
            stl: 2,
            blk: 1,
            ..PlayerStatLine::default()
        };
        let adv = advanced_line(&row);
        assert_eq!((adv.pra, adv.pr, adv.pa, adv.ra, adv.stocks), (34, 28, 26, 14, 3));
    }

    #[test]
    fn input_rows_are_left_untouched() {
        let rows = vec![line(10, 4, 8, 2, 1)];
        let before = rows.clone();
        let adv = compute_advanced(&rows);
        assert_eq!(rows, before);
        assert_eq!(adv.len(), 1);
        assert_eq!(adv[0].base, before[0]);
    }
}
