//! Offset pagination over TargetProcess collections.

use std::future::Future;

use crate::error::SourceError;

/// Drain a `take`/`skip` paginated collection.
///
/// Requests `page_size` items at offsets `0, page_size, 2 * page_size, …` and
/// stops on the first *empty* page, so a collection whose size is an exact
/// multiple of the page size still terminates, after one extra request. For
/// `N` items this issues `ceil(N / page_size) + 1` requests.
///
/// Any error aborts the whole fetch; pages already read are discarded.
pub async fn paginate<T, F, Fut>(page_size: u32, mut fetch_page: F) -> Result<Vec<T>, SourceError>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Vec<T>, SourceError>>,
{
    if page_size == 0 {
        return Err(SourceError::Config("page size must be positive".into()));
    }

    let mut skip: u64 = 0;
    let mut items = Vec::new();
    loop {
        let page = fetch_page(skip).await?;
        if page.is_empty() {
            break;
        }
        items.extend(page);
        skip += u64::from(page_size);
    }
    Ok(items)
}
