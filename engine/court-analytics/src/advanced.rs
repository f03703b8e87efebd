//! Team advanced stats: possessions, ratings, four factors and shooting splits
//!
//! Every team-game is the team's totals line paired with the opponent's
//! totals line from the same game. Sums over a group of team-games feed the
//! formulas below; a ratio whose denominator is not positive is 0.

use crate::boxscore::{BoxScoreLine, CountingStats, LineKind};
use crate::competition::Competition;
use crate::records::TeamDirectory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Index;
use tracing::{debug, info};

pub const LEAGUE_TEAM_CODE: &str = "League";
pub const LEAGUE_TEAM_NAME: &str = "League Averages";

/// Scales possessions to a 40-minute game
const PACE_FACTOR: f64 = 200.0 / 202.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Metric {
    Pace,
    EfficiencyO,
    EfficiencyD,
    NetRating,
    EfgPercO,
    EfgPercD,
    ToRatioO,
    ToRatioD,
    OrebPercO,
    OrebPercD,
    FtRateO,
    FtRateD,
    ThreePercO,
    ThreePercD,
    TwoPercO,
    TwoPercD,
    FtPercO,
    FtPercD,
    ThreeAttemptRateO,
    ThreeAttemptRateD,
    AssistPercO,
    AssistPercD,
    StealPercO,
    StealPercD,
    BlockPercO,
    BlockPercD,
    Points2PercO,
    Points2PercD,
    Points3PercO,
    Points3PercD,
    PointsFtPercO,
    PointsFtPercD,
}

impl Metric {
    pub const COUNT: usize = 32;

    pub const ALL: [Metric; Metric::COUNT] = [
        Metric::Pace,
        Metric::EfficiencyO,
        Metric::EfficiencyD,
        Metric::NetRating,
        Metric::EfgPercO,
        Metric::EfgPercD,
        Metric::ToRatioO,
        Metric::ToRatioD,
        Metric::OrebPercO,
        Metric::OrebPercD,
        Metric::FtRateO,
        Metric::FtRateD,
        Metric::ThreePercO,
        Metric::ThreePercD,
        Metric::TwoPercO,
        Metric::TwoPercD,
        Metric::FtPercO,
        Metric::FtPercD,
        Metric::ThreeAttemptRateO,
        Metric::ThreeAttemptRateD,
        Metric::AssistPercO,
        Metric::AssistPercD,
        Metric::StealPercO,
        Metric::StealPercD,
        Metric::BlockPercO,
        Metric::BlockPercD,
        Metric::Points2PercO,
        Metric::Points2PercD,
        Metric::Points3PercO,
        Metric::Points3PercD,
        Metric::PointsFtPercO,
        Metric::PointsFtPercD,
    ];

    /// Column name in the advanced stats table
    pub fn column(self) -> &'static str {
        match self {
            Metric::Pace => "pace",
            Metric::EfficiencyO => "efficiency_o",
            Metric::EfficiencyD => "efficiency_d",
            Metric::NetRating => "net_rating",
            Metric::EfgPercO => "efgperc_o",
            Metric::EfgPercD => "efgperc_d",
            Metric::ToRatioO => "toratio_o",
            Metric::ToRatioD => "toratio_d",
            Metric::OrebPercO => "orebperc_o",
            Metric::OrebPercD => "orebperc_d",
            Metric::FtRateO => "ftrate_o",
            Metric::FtRateD => "ftrate_d",
            Metric::ThreePercO => "threeperc_o",
            Metric::ThreePercD => "threeperc_d",
            Metric::TwoPercO => "twoperc_o",
            Metric::TwoPercD => "twoperc_d",
            Metric::FtPercO => "ftperc_o",
            Metric::FtPercD => "ftperc_d",
            Metric::ThreeAttemptRateO => "threeattmprate_o",
            Metric::ThreeAttemptRateD => "threeattmprate_d",
            Metric::AssistPercO => "assistperc_o",
            Metric::AssistPercD => "assistperc_d",
            Metric::StealPercO => "stealperc_o",
            Metric::StealPercD => "stealperc_d",
            Metric::BlockPercO => "blockperc_o",
            Metric::BlockPercD => "blockperc_d",
            Metric::Points2PercO => "points2perc_o",
            Metric::Points2PercD => "points2perc_d",
            Metric::Points3PercO => "points3perc_o",
            Metric::Points3PercD => "points3perc_d",
            Metric::PointsFtPercO => "pointsftperc_o",
            Metric::PointsFtPercD => "pointsftperc_d",
        }
    }

    /// Column name of the metric's rank
    pub fn rank_column(self) -> &'static str {
        match self {
            Metric::Pace => "rank_pace",
            Metric::EfficiencyO => "rank_efficiency_o",
            Metric::EfficiencyD => "rank_efficiency_d",
            Metric::NetRating => "rank_net_rating",
            Metric::EfgPercO => "rank_efgperc_o",
            Metric::EfgPercD => "rank_efgperc_d",
            Metric::ToRatioO => "rank_toratio_o",
            Metric::ToRatioD => "rank_toratio_d",
            Metric::OrebPercO => "rank_orebperc_o",
            Metric::OrebPercD => "rank_orebperc_d",
            Metric::FtRateO => "rank_ftrate_o",
            Metric::FtRateD => "rank_ftrate_d",
            Metric::ThreePercO => "rank_threeperc_o",
            Metric::ThreePercD => "rank_threeperc_d",
            Metric::TwoPercO => "rank_twoperc_o",
            Metric::TwoPercD => "rank_twoperc_d",
            Metric::FtPercO => "rank_ftperc_o",
            Metric::FtPercD => "rank_ftperc_d",
            Metric::ThreeAttemptRateO => "rank_threeattmprate_o",
            Metric::ThreeAttemptRateD => "rank_threeattmprate_d",
            Metric::AssistPercO => "rank_assistperc_o",
            Metric::AssistPercD => "rank_assistperc_d",
            Metric::StealPercO => "rank_stealperc_o",
            Metric::StealPercD => "rank_stealperc_d",
            Metric::BlockPercO => "rank_blockperc_o",
            Metric::BlockPercD => "rank_blockperc_d",
            Metric::Points2PercO => "rank_points2perc_o",
            Metric::Points2PercD => "rank_points2perc_d",
            Metric::Points3PercO => "rank_points3perc_o",
            Metric::Points3PercD => "rank_points3perc_d",
            Metric::PointsFtPercO => "rank_pointsftperc_o",
            Metric::PointsFtPercD => "rank_pointsftperc_d",
        }
    }

    /// Whether rank 1 goes to the lowest value
    pub fn lower_is_better(self) -> bool {
        matches!(
            self,
            Metric::EfficiencyD
                | Metric::EfgPercD
                | Metric::ToRatioO
                | Metric::OrebPercD
                | Metric::FtRateD
                | Metric::ThreePercD
                | Metric::TwoPercD
                | Metric::FtPercD
                | Metric::ThreeAttemptRateD
                | Metric::AssistPercD
                | Metric::Points2PercD
                | Metric::Points3PercD
                | Metric::PointsFtPercD
        )
    }

    /// Pace and the ratings get a wider column than the percentages
    pub fn is_rating(self) -> bool {
        matches!(self, Metric::Pace | Metric::EfficiencyO | Metric::EfficiencyD | Metric::NetRating)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// The 32 metric values of one row, indexed by [`Metric`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricValues([f64; Metric::COUNT]);

impl Index<Metric> for MetricValues {
    type Output = f64;

    fn index(&self, metric: Metric) -> &f64 {
        &self.0[metric.index()]
    }
}

/// Ranks of one row, indexed by [`Metric`]; 0 for league rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRanks([i32; Metric::COUNT]);

impl Default for MetricRanks {
    fn default() -> Self {
        Self([0; Metric::COUNT])
    }
}

impl Index<Metric> for MetricRanks {
    type Output = i32;

    fn index(&self, metric: Metric) -> &i32 {
        &self.0[metric.index()]
    }
}

/// A team's totals line together with the opponent's from the same game
#[derive(Debug, Clone, PartialEq)]
pub struct TeamGame {
    pub season: i32,
    pub phase_group: String,
    pub team: String,
    pub own: CountingStats,
    pub opponent: CountingStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAdvancedStats {
    pub season: i32,
    pub phase: String,
    pub team_code: String,
    pub team_name: String,
    pub team_logo: String,
    pub games_played: i32,
    pub metrics: MetricValues,
    pub ranks: MetricRanks,
}

impl TeamAdvancedStats {
    pub fn is_league(&self) -> bool {
        self.team_code == LEAGUE_TEAM_CODE
    }
}

/// Pair every totals line with the other side's totals line of the same
/// game. Lines without an opponent are dropped.
pub fn pair_team_games(competition: Competition, lines: &[BoxScoreLine]) -> Vec<TeamGame> {
    let totals: Vec<&BoxScoreLine> = lines.iter().filter(|l| l.kind() == LineKind::Total).collect();

    let mut by_game: BTreeMap<(i32, i32), Vec<&BoxScoreLine>> = BTreeMap::new();
    for line in &totals {
        by_game.entry((line.season, line.gamecode)).or_default().push(line);
    }

    let mut games = Vec::with_capacity(totals.len());
    for line in &totals {
        let opponent = by_game
            .get(&(line.season, line.gamecode))
            .and_then(|sides| sides.iter().find(|other| other.team != line.team));
        let Some(opponent) = opponent else {
            debug!("No opponent totals for {} in game {} ({})", line.team, line.gamecode, line.season);
            continue;
        };

        games.push(TeamGame {
            season: line.season,
            phase_group: competition.phase_group(&line.phase),
            team: line.team.clone(),
            own: line.counting(),
            opponent: opponent.counting(),
        });
    }

    info!("Matched {} of {} team totals with opponent data", games.len(), totals.len());
    games
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * 100.0
    } else {
        0.0
    }
}

/// Compute every metric over a group of team-games
pub fn compute_metrics(games: &[&TeamGame]) -> MetricValues {
    let mut t = CountingStats::default();
    let mut o = CountingStats::default();
    for game in games {
        t += game.own;
        o += game.opponent;
    }
    let games_played = games.len() as f64;

    let fgm = t.field_goals_made();
    let fga = t.field_goals_attempted();
    let opp_fgm = o.field_goals_made();
    let opp_fga = o.field_goals_attempted();
    let opp_fga2 = opp_fga - o.fg3_attempted;
    let opp_fgm2 = opp_fgm - o.fg3_made;

    let team_poss = fga + 0.4 * t.ft_attempted
        - 1.07 * (t.offensive_rebounds / (t.offensive_rebounds + o.defensive_rebounds).max(1.0))
            * (fga - fgm)
        + t.turnovers;
    let opp_poss = opp_fga + 0.4 * o.ft_attempted
        - 1.07 * (o.offensive_rebounds / (o.offensive_rebounds + t.defensive_rebounds).max(1.0))
            * (opp_fga - opp_fgm)
        + o.turnovers;

    let avg_total_poss =
        if games_played > 0.0 { (team_poss + opp_poss) / games_played } else { 0.0 };
    let pace = if avg_total_poss > 0.0 { PACE_FACTOR * avg_total_poss / 2.0 } else { 0.0 };
    let efficiency_o = ratio(t.points, team_poss);
    let efficiency_d = ratio(o.points, opp_poss);

    let mut values = [0.0; Metric::COUNT];
    for metric in Metric::ALL {
        values[metric.index()] = match metric {
            Metric::Pace => pace,
            Metric::EfficiencyO => efficiency_o,
            Metric::EfficiencyD => efficiency_d,
            Metric::NetRating => efficiency_o - efficiency_d,
            Metric::EfgPercO => ratio(fgm + 0.5 * t.fg3_made, fga),
            Metric::EfgPercD => ratio(opp_fgm + 0.5 * o.fg3_made, opp_fga),
            Metric::ToRatioO => ratio(t.turnovers, fga + t.turnovers + 0.44 * t.ft_attempted),
            Metric::ToRatioD => ratio(o.turnovers, opp_fga + o.turnovers + 0.44 * o.ft_attempted),
            Metric::OrebPercO => {
                ratio(t.offensive_rebounds, t.offensive_rebounds + o.defensive_rebounds)
            }
            Metric::OrebPercD => {
                ratio(o.offensive_rebounds, o.offensive_rebounds + t.defensive_rebounds)
            }
            Metric::FtRateO => ratio(t.ft_attempted, fga),
            Metric::FtRateD => ratio(o.ft_attempted, opp_fga),
            Metric::ThreePercO => ratio(t.fg3_made, t.fg3_attempted),
            Metric::ThreePercD => ratio(o.fg3_made, o.fg3_attempted),
            Metric::TwoPercO => ratio(t.fg2_made, t.fg2_attempted),
            Metric::TwoPercD => ratio(opp_fgm2, opp_fga2),
            Metric::FtPercO => ratio(t.ft_made, t.ft_attempted),
            Metric::FtPercD => ratio(o.ft_made, o.ft_attempted),
            Metric::ThreeAttemptRateO => ratio(t.fg3_attempted, fga),
            Metric::ThreeAttemptRateD => ratio(o.fg3_attempted, opp_fga),
            Metric::AssistPercO => ratio(t.assists, fgm),
            Metric::AssistPercD => ratio(o.assists, opp_fgm),
            Metric::StealPercO => ratio(t.steals, opp_poss),
            Metric::StealPercD => ratio(o.steals, team_poss),
            Metric::BlockPercO => ratio(o.blocks_favour, t.fg2_attempted),
            Metric::BlockPercD => ratio(t.blocks_favour, opp_fga2),
            Metric::Points2PercO => ratio(t.fg2_made * 2.0, t.points),
            Metric::Points2PercD => ratio(opp_fgm2 * 2.0, o.points),
            Metric::Points3PercO => ratio(t.fg3_made * 3.0, t.points),
            Metric::Points3PercD => ratio(o.fg3_made * 3.0, o.points),
            Metric::PointsFtPercO => ratio(t.ft_made, t.points),
            Metric::PointsFtPercD => ratio(o.ft_made, o.points),
        };
    }
    MetricValues(values)
}

/// Rank with ties sharing the best position ("min" method)
fn min_rank(value: f64, all: &[f64], lower_is_better: bool) -> i32 {
    let better = all
        .iter()
        .filter(|&&other| if lower_is_better { other < value } else { other > value })
        .count();
    better as i32 + 1
}

/// Advanced stats per (season, phase group, team), followed by the league
/// rows per (season, phase group)
pub fn build_advanced_stats(
    competition: Competition,
    lines: &[BoxScoreLine],
    directory: &TeamDirectory,
) -> Vec<TeamAdvancedStats> {
    let games = pair_team_games(competition, lines);

    let mut by_team: BTreeMap<(i32, &str, &str), Vec<&TeamGame>> = BTreeMap::new();
    let mut by_phase: BTreeMap<(i32, &str), Vec<&TeamGame>> = BTreeMap::new();
    for game in &games {
        by_team
            .entry((game.season, game.phase_group.as_str(), game.team.as_str()))
            .or_default()
            .push(game);
        by_phase.entry((game.season, game.phase_group.as_str())).or_default().push(game);
    }

    let mut team_rows: Vec<TeamAdvancedStats> = by_team
        .into_iter()
        .map(|((season, phase, team), group)| {
            let (team_name, team_logo) = match directory.get(season, team) {
                Some(info) => (info.name.clone(), info.logo.clone().unwrap_or_default()),
                None => (team.to_string(), String::new()),
            };
            TeamAdvancedStats {
                season,
                phase: phase.to_string(),
                team_code: team.to_string(),
                team_name,
                team_logo,
                games_played: group.len() as i32,
                metrics: compute_metrics(&group),
                ranks: MetricRanks::default(),
            }
        })
        .collect();

    assign_ranks(&mut team_rows);

    let league_rows = by_phase.into_iter().map(|((season, phase), group)| TeamAdvancedStats {
        season,
        phase: phase.to_string(),
        team_code: LEAGUE_TEAM_CODE.to_string(),
        team_name: LEAGUE_TEAM_NAME.to_string(),
        team_logo: String::new(),
        games_played: group.len() as i32,
        metrics: compute_metrics(&group),
        ranks: MetricRanks::default(),
    });

    team_rows.extend(league_rows);
    team_rows
}

/// Rank team rows against the other teams of the same season and phase
pub fn assign_ranks(rows: &mut [TeamAdvancedStats]) {
    let mut groups: BTreeMap<(i32, String), Vec<usize>> = BTreeMap::new();
    for (index, row) in rows.iter().enumerate().filter(|(_, r)| !r.is_league()) {
        groups.entry((row.season, row.phase.clone())).or_default().push(index);
    }

    for members in groups.values() {
        for metric in Metric::ALL {
            let values: Vec<f64> = members.iter().map(|&i| rows[i].metrics[metric]).collect();
            for (&i, &value) in members.iter().zip(&values) {
                rows[i].ranks.0[metric.index()] =
                    min_rank(value, &values, metric.lower_is_better());
            }
        }
    }
}
