//! Query string helpers shared by the route modules
//!
//! Parameters arrive as a raw map, as the dashboard sends them. Blank values
//! count as absent.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::NaiveDate;
use painel_core::{Page, TransactionFilter};

use crate::error::{ApiError, ApiResult};

pub type Params = HashMap<String, String>;

fn value<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params.get(key).map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Parse an optional parameter with `FromStr`
pub fn optional<T: FromStr>(params: &Params, key: &str) -> ApiResult<Option<T>> {
    value(params, key)
        .map(|raw| {
            raw.parse()
                .map_err(|_| ApiError::bad_request(format!("invalid value for '{}': {}", key, raw)))
        })
        .transpose()
}

/// `skip` and `limit`, with `default_limit` when no limit is given
pub fn page(params: &Params, default_limit: usize) -> ApiResult<Page> {
    let skip = optional::<usize>(params, "skip")?.unwrap_or(0);
    let limit = optional::<usize>(params, "limit")?.unwrap_or(default_limit);
    Ok(Page::new(skip, limit))
}

/// Transaction filter from `cliente_nome`, `data_inicio` and `data_fim`
pub fn transaction_filter(params: &Params) -> ApiResult<TransactionFilter> {
    Ok(TransactionFilter {
        client_name_contains: value(params, "cliente_nome").map(str::to_string),
        date_from: optional::<NaiveDate>(params, "data_inicio")?,
        date_to: optional::<NaiveDate>(params, "data_fim")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_page_defaults() {
        assert_eq!(page(&params(&[]), 100).unwrap(), Page::new(0, 100));
        assert_eq!(page(&params(&[("skip", "20"), ("limit", " ")]), 100).unwrap(), Page::new(20, 100));
        assert!(page(&params(&[("limit", "-1")]), 100).is_err());
    }

    #[test]
    fn test_transaction_filter() {
        let filter = transaction_filter(&params(&[
            ("cliente_nome", "maria"),
            ("data_inicio", "2024-01-01"),
            ("data_fim", ""),
        ]))
        .unwrap();
        assert_eq!(filter.client_name_contains.as_deref(), Some("maria"));
        assert_eq!(filter.date_from, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(filter.date_to, None);

        assert!(transaction_filter(&params(&[("data_fim", "31/12/2024")])).is_err());
    }
}
