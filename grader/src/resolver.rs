//! # Column Resolver Module
//!
//! Turns an authored [`ComputationSpec`] (which may carry unresolved
//! column/criteria references) into a concrete [`Computation`]. Resolution
//! never fails: keyword matching runs first, then type-based fallbacks over
//! the column statistics, ending with the first column of the right shape.
//! Every inferred reference is recorded so callers can tell "author
//! specified" from "heuristically inferred" in diagnostics.
//!
//! Keyword tie-break is first array-order match wins. That is an
//! authoring-time ambiguity, not a correctness guarantee.

use crate::computation::{
    ColumnRef, Computation, ComputationSpec, CriteriaEntry, CriteriaRef, ResolvedCriteria,
};
use util::dataset::stats::{ColumnStats, ColumnType};

/// Domain keywords for numeric aggregation targets, tried in order.
const NUMERIC_KEYWORDS: &[&str] = &[
    "total", "amount", "montant", "revenue", "sales", "price", "prix", "cost", "cout", "quantity",
    "quantite", "salaire", "salary", "note", "score",
];

/// Domain keywords for categorical (criteria) columns, tried in order.
const CATEGORY_KEYWORDS: &[&str] = &[
    "category", "categorie", "type", "status", "statut", "region", "city", "ville", "departement",
    "department", "service", "product", "produit",
];

/// Domain keywords for lookup search-key columns, tried in order.
const LOOKUP_KEYWORDS: &[&str] = &[
    "id", "code", "reference", "name", "nom", "product", "produit",
];

/// Literal used when no criteria value can be inferred from the data.
const FALLBACK_CRITERIA: &str = "Valeur";

/// Outcome of resolving one spec: the concrete computation plus a record
/// of which references were inferred rather than authored.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub computation: Computation,
    /// Human-readable notes, one per inferred column or criteria value.
    pub inferred: Vec<String>,
}

impl Resolution {
    /// True when every reference came from the author.
    pub fn fully_authored(&self) -> bool {
        self.inferred.is_empty()
    }
}

/// Resolve an authored spec against the dataset's column statistics.
pub fn resolve(spec: ComputationSpec, stats: &[ColumnStats]) -> Resolution {
    let mut resolver = Resolver { stats, inferred: Vec::new() };
    let computation = resolver.resolve_spec(spec);
    Resolution { computation, inferred: resolver.inferred }
}

struct Resolver<'a> {
    stats: &'a [ColumnStats],
    inferred: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn resolve_spec(&mut self, spec: ComputationSpec) -> Computation {
        match spec {
            ComputationSpec::Sum { column } => Computation::Sum {
                column: self.numeric_column(column, "sum"),
            },
            ComputationSpec::Average { column } => Computation::Average {
                column: self.numeric_column(column, "average"),
            },
            ComputationSpec::Min { column } => Computation::Min {
                column: self.numeric_column(column, "min"),
            },
            ComputationSpec::Max { column } => Computation::Max {
                column: self.numeric_column(column, "max"),
            },
            ComputationSpec::Count { column } => Computation::Count {
                column: self.numeric_column(column, "count"),
            },
            ComputationSpec::CountA { column } => Computation::CountA {
                column: self.text_column(column, "counta"),
            },
            ComputationSpec::CountIf { column, criteria } => {
                let column = self.text_column(column, "countif");
                let criteria = self.criteria_value(criteria, &column);
                Computation::CountIf { column, criteria }
            }
            ComputationSpec::CountIfs { criteria } => Computation::CountIfs {
                criteria: self.criteria_entries(criteria),
            },
            ComputationSpec::SumIf { criteria_column, criteria, sum_column } => {
                let criteria_column = self.text_column(criteria_column, "sumif");
                let criteria = self.criteria_value(criteria, &criteria_column);
                // No sum column means the criteria column sums itself.
                let sum_column = match sum_column {
                    None => criteria_column.clone(),
                    Some(reference) => self.numeric_column(reference, "sumif"),
                };
                Computation::SumIf { criteria_column, criteria, sum_column }
            }
            ComputationSpec::SumIfs { sum_column, criteria } => Computation::SumIfs {
                sum_column: self.numeric_column(sum_column, "sumifs"),
                criteria: self.criteria_entries(criteria),
            },
            ComputationSpec::AverageIf { criteria_column, criteria, average_column } => {
                let criteria_column = self.text_column(criteria_column, "averageif");
                let criteria = self.criteria_value(criteria, &criteria_column);
                let average_column = match average_column {
                    None => criteria_column.clone(),
                    Some(reference) => self.numeric_column(reference, "averageif"),
                };
                Computation::AverageIf { criteria_column, criteria, average_column }
            }
            ComputationSpec::Lookup { search_column, search_value, return_column, approximate } => {
                Computation::Lookup {
                    search_column: self.lookup_column(search_column, "lookup"),
                    search_value,
                    return_column: self.numeric_column(return_column, "lookup"),
                    approximate,
                }
            }
            ComputationSpec::IndexMatch { search_column, search_value, return_column } => {
                Computation::IndexMatch {
                    search_column: self.lookup_column(search_column, "index_match"),
                    search_value,
                    return_column: self.numeric_column(return_column, "index_match"),
                }
            }
            ComputationSpec::HLookup { search_value, row_index } => {
                Computation::HLookup { search_value, row_index }
            }
            ComputationSpec::SumProduct { columns } => Computation::SumProduct {
                columns: columns
                    .into_iter()
                    .map(|c| self.numeric_column(c, "sumproduct"))
                    .collect(),
            },
            ComputationSpec::Conditional { value, condition, if_true, if_false } => {
                Computation::Conditional { value, condition, if_true, if_false }
            }
            ComputationSpec::Manual => Computation::Manual,
        }
    }

    /// Numeric target: keywords, then the first numeric column with a
    /// nonzero sum, then the first numeric column, then the first column.
    fn numeric_column(&mut self, reference: ColumnRef, context: &str) -> String {
        if let ColumnRef::Named(name) = reference {
            return name;
        }

        let picked = keyword_match(self.stats, NUMERIC_KEYWORDS)
            .or_else(|| {
                self.stats.iter().find(|s| {
                    s.column_type == ColumnType::Numeric && s.sum.unwrap_or(0.0) != 0.0
                })
            })
            .or_else(|| self.stats.iter().find(|s| s.column_type == ColumnType::Numeric))
            .or_else(|| self.stats.first());

        self.record(picked, context)
    }

    /// Text/criteria target: keywords, then the first text column with a
    /// "reasonable categorical" distinct count in [2, 20], then the first
    /// text column, then the first column.
    fn text_column(&mut self, reference: ColumnRef, context: &str) -> String {
        if let ColumnRef::Named(name) = reference {
            return name;
        }

        let picked = keyword_match(self.stats, CATEGORY_KEYWORDS)
            .or_else(|| {
                self.stats.iter().find(|s| {
                    s.column_type == ColumnType::Text
                        && s.distinct_count.is_some_and(|d| (2..=20).contains(&d))
                })
            })
            .or_else(|| self.stats.iter().find(|s| s.column_type == ColumnType::Text))
            .or_else(|| self.stats.first());

        self.record(picked, context)
    }

    /// Lookup search key: lookup keywords, then the text fallback chain.
    fn lookup_column(&mut self, reference: ColumnRef, context: &str) -> String {
        if let ColumnRef::Named(name) = reference {
            return name;
        }

        match keyword_match(self.stats, LOOKUP_KEYWORDS) {
            Some(stats) => self.record(Some(stats), context),
            None => self.text_column(ColumnRef::Auto, context),
        }
    }

    /// Criteria value tied to an already-resolved column: its most-frequent
    /// value, else its first ranked value, else the literal fallback.
    fn criteria_value(&mut self, reference: CriteriaRef, column: &str) -> String {
        if let CriteriaRef::Value(value) = reference {
            return value;
        }

        let value = self
            .stats
            .iter()
            .find(|s| s.name == column)
            .and_then(|s| s.top_values.first())
            .map(|(value, _)| value.clone())
            .unwrap_or_else(|| FALLBACK_CRITERIA.to_string());

        tracing::debug!(column, %value, "inferred criteria value");
        self.inferred.push(format!("criteria '{value}' inferred for column '{column}'"));
        value
    }

    /// Multi-criteria entries resolve independently; an unresolved column
    /// falls back positionally to the i-th text column.
    fn criteria_entries(&mut self, entries: Vec<CriteriaEntry>) -> Vec<ResolvedCriteria> {
        let text_columns: Vec<String> = self
            .stats
            .iter()
            .filter(|s| s.column_type == ColumnType::Text)
            .map(|s| s.name.clone())
            .collect();

        entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let column = match entry.column {
                    ColumnRef::Named(name) => name,
                    ColumnRef::Auto => match keyword_match(self.stats, CATEGORY_KEYWORDS) {
                        Some(stats) if i == 0 => self.record(Some(stats), "criteria"),
                        _ => {
                            let name = text_columns
                                .get(i)
                                .or_else(|| text_columns.first())
                                .cloned()
                                .unwrap_or_else(|| {
                                    self.stats
                                        .first()
                                        .map(|s| s.name.clone())
                                        .unwrap_or_else(|| FALLBACK_CRITERIA.to_string())
                                });
                            self.inferred
                                .push(format!("column '{name}' inferred for criteria {}", i + 1));
                            name
                        }
                    },
                };
                let criteria = self.criteria_value(entry.criteria, &column);
                ResolvedCriteria { column, criteria }
            })
            .collect()
    }

    fn record(&mut self, picked: Option<&ColumnStats>, context: &str) -> String {
        let name = picked
            .map(|s| s.name.clone())
            .unwrap_or_else(|| FALLBACK_CRITERIA.to_string());
        tracing::debug!(column = %name, context, "inferred column");
        self.inferred.push(format!("column '{name}' inferred for {context}"));
        name
    }
}

/// First keyword (in table order) whose substring appears in a column
/// name, case-insensitively; first matching column wins.
fn keyword_match<'a>(stats: &'a [ColumnStats], keywords: &[&str]) -> Option<&'a ColumnStats> {
    for keyword in keywords {
        if let Some(found) = stats
            .iter()
            .find(|s| s.name.to_lowercase().contains(keyword))
        {
            return Some(found);
        }
    }
    None
}
