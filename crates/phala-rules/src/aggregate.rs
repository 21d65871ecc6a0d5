//! Rolling evaluated rules up into ranked theme summaries.

use std::collections::BTreeSet;

use phala_core::{
  rule::EvaluatedRule,
  summary::{AreaSummary, LevelThresholds, ThemeSummary},
};

struct AreaTotals<'a> {
  area:        &'a str,
  score:       f64,
  lead:        &'a EvaluatedRule,
  rule_ids:    BTreeSet<String>,
  point_codes: BTreeSet<String>,
}

struct ThemeTotals<'a> {
  theme: &'a str,
  total: f64,
  areas: Vec<AreaTotals<'a>>,
}

/// Group by theme then area and sum scores. Only positive, finite scores
/// contribute. An area's trend and tone come from its highest-scoring rule,
/// the first one seen on a tie. Themes are ranked by descending total, ties
/// keeping encounter order.
pub fn aggregate(
  evaluated: &[EvaluatedRule],
  thresholds: &LevelThresholds,
) -> Vec<ThemeSummary> {
  let mut themes: Vec<ThemeTotals<'_>> = Vec::new();

  for rule in evaluated
    .iter()
    .filter(|r| r.score.is_finite() && r.score > 0.0)
  {
    let theme = match themes.iter().position(|t| t.theme == rule.theme) {
      Some(i) => &mut themes[i],
      None => {
        themes.push(ThemeTotals {
          theme: &rule.theme,
          total: 0.0,
          areas: Vec::new(),
        });
        let last = themes.len() - 1;
        &mut themes[last]
      }
    };
    theme.total += rule.score;

    let area = match theme.areas.iter().position(|a| a.area == rule.area) {
      Some(i) => {
        let area = &mut theme.areas[i];
        area.score += rule.score;
        if rule.score > area.lead.score {
          area.lead = rule;
        }
        area
      }
      None => {
        theme.areas.push(AreaTotals {
          area:        &rule.area,
          score:       rule.score,
          lead:        rule,
          rule_ids:    BTreeSet::new(),
          point_codes: BTreeSet::new(),
        });
        let last = theme.areas.len() - 1;
        &mut theme.areas[last]
      }
    };
    area.rule_ids.insert(rule.rule_id.clone());
    if let Some(code) = &rule.point_code {
      area.point_codes.insert(code.clone());
    }
  }

  let mut summaries: Vec<ThemeSummary> = themes
    .into_iter()
    .map(|t| ThemeSummary {
      theme:       t.theme.to_string(),
      total_score: t.total,
      level:       thresholds.level(t.total),
      rank:        0,
      areas:       t
        .areas
        .into_iter()
        .map(|a| AreaSummary {
          area:        a.area.to_string(),
          score:       a.score,
          level:       thresholds.level(a.score),
          trend:       a.lead.trend.clone(),
          tone:        a.lead.tone.clone(),
          rule_ids:    a.rule_ids,
          point_codes: a.point_codes,
        })
        .collect(),
    })
    .collect();

  // Stable sort keeps encounter order among equal totals.
  summaries.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
  for (i, summary) in summaries.iter_mut().enumerate() {
    summary.rank = i + 1;
  }
  summaries
}
