//! Request routing over the item store.
//!
//! # Responsibility
//! - Map a parsed request onto exactly one route, in precedence order.
//! - Call the store and render its outcome as a response.
//!
//! # Invariants
//! - Every input buffer yields a well-formed response; nothing here panics
//!   or propagates an error to the transport loop.
//! - A store fault is a 500, never a 404.
//! - The router keeps no state between requests beyond the owned store.

use crate::http::{Method, Request, RequestParseError, Response, StatusCode};
use itemsvc_core::{ItemId, ItemRepository, StoreResult};
use log::{error, info, warn};

const ITEMS_PATH: &str = "/items";
const ITEM_PATH_PREFIX: &str = "/items/";
const INDEX_PAGE: &str = include_str!("index.html");

/// Route selected for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Index,
    ListItems,
    CreateItem,
    GetItem(ItemId),
    UpdateItem(ItemId),
    DeleteItem(ItemId),
    /// `/items/{id}` with a method that takes an id but a suffix that is
    /// not a decimal integer.
    InvalidItemId,
    NotFound,
}

impl Route {
    /// Classifies `method` + `path`. First match wins.
    pub fn resolve(method: &Method, path: &str) -> Self {
        match (method, path) {
            (Method::Get, "/") => return Self::Index,
            (Method::Get, ITEMS_PATH) => return Self::ListItems,
            (Method::Post, ITEMS_PATH) => return Self::CreateItem,
            _ => {}
        }

        let Some(suffix) = path.strip_prefix(ITEM_PATH_PREFIX) else {
            return Self::NotFound;
        };
        let with_id: fn(ItemId) -> Self = match method {
            Method::Get => Self::GetItem,
            Method::Put => Self::UpdateItem,
            Method::Delete => Self::DeleteItem,
            Method::Post | Method::Other(_) => return Self::NotFound,
        };

        match suffix.parse::<ItemId>() {
            Ok(id) => with_id(id),
            Err(_) => Self::InvalidItemId,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::ListItems => "list_items",
            Self::CreateItem => "create_item",
            Self::GetItem(_) => "get_item",
            Self::UpdateItem(_) => "update_item",
            Self::DeleteItem(_) => "delete_item",
            Self::InvalidItemId => "invalid_item_id",
            Self::NotFound => "not_found",
        }
    }
}

/// Byte-to-byte request handler owning the item store.
pub struct Router<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> Router<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Parses `raw`, routes it and renders the response bytes.
    pub fn handle(&self, raw: &[u8]) -> Vec<u8> {
        let response = match Request::parse(raw) {
            Ok(request) => self.respond(&request),
            Err(err) => {
                warn!("event=request module=router status=rejected error={err}");
                let message = match err {
                    RequestParseError::MalformedRequestLine(_) => "Malformed request\n",
                    RequestParseError::InvalidBodyEncoding => "Request body is not valid UTF-8\n",
                };
                Response::text(StatusCode::BadRequest, message)
            }
        };
        response.to_bytes()
    }

    /// Routes an already parsed request.
    pub fn respond(&self, request: &Request) -> Response {
        let route = Route::resolve(&request.method, &request.path);
        let response = self.dispatch(route, request).unwrap_or_else(|err| {
            error!(
                "event=request module=router status=error method={} route={} error={err}",
                request.method,
                route.name()
            );
            Response::empty(StatusCode::InternalServerError)
        });

        info!(
            "event=request module=router status={} method={} route={} body_bytes={}",
            response.status.code(),
            request.method,
            route.name(),
            response.body.len()
        );
        response
    }

    fn dispatch(&self, route: Route, request: &Request) -> StoreResult<Response> {
        let response = match route {
            Route::Index => Response::html(INDEX_PAGE),
            Route::ListItems => {
                let body = self
                    .repo
                    .list_items()?
                    .iter()
                    .map(|item| format!("{}: {}\n", item.id, item.name))
                    .collect::<String>();
                Response::text(StatusCode::Ok, body)
            }
            Route::CreateItem => {
                let id = self.repo.create_item(&request.body)?;
                Response::text(StatusCode::Created, format!("Created item with ID {id}\n"))
            }
            Route::GetItem(id) => match self.repo.get_item(id)? {
                Some(item) => Response::text(StatusCode::Ok, format!("{}\n", item.name)),
                None => Response::not_found(),
            },
            Route::UpdateItem(id) => {
                if self.repo.update_item(id, &request.body)? {
                    Response::text(StatusCode::Ok, "Updated\n")
                } else {
                    Response::not_found()
                }
            }
            Route::DeleteItem(id) => {
                if self.repo.delete_item(id)? {
                    Response::text(StatusCode::Ok, "Deleted\n")
                } else {
                    Response::not_found()
                }
            }
            Route::InvalidItemId => Response::text(StatusCode::BadRequest, "Invalid item id\n"),
            Route::NotFound => Response::not_found(),
        };
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::Route;
    use crate::http::Method;

    #[test]
    fn collection_and_member_paths_do_not_overlap() {
        assert_eq!(Route::resolve(&Method::Get, "/items"), Route::ListItems);
        assert_eq!(Route::resolve(&Method::Get, "/items/5"), Route::GetItem(5));
        assert_eq!(Route::resolve(&Method::Get, "/items/"), Route::InvalidItemId);
    }

    #[test]
    fn index_is_get_only() {
        assert_eq!(Route::resolve(&Method::Get, "/"), Route::Index);
        assert_eq!(Route::resolve(&Method::Post, "/"), Route::NotFound);
    }

    #[test]
    fn methods_map_to_member_routes() {
        assert_eq!(Route::resolve(&Method::Put, "/items/7"), Route::UpdateItem(7));
        assert_eq!(Route::resolve(&Method::Delete, "/items/7"), Route::DeleteItem(7));
        assert_eq!(Route::resolve(&Method::Post, "/items/7"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::Put, "/items"), Route::NotFound);
        assert_eq!(
            Route::resolve(&Method::Other("PATCH".to_string()), "/items/7"),
            Route::NotFound
        );
    }

    #[test]
    fn non_numeric_suffixes_are_invalid_ids() {
        for path in ["/items/abc", "/items/12abc", "/items/1/2", "/items/ 1", "/items/99999999999999999999"] {
            assert_eq!(
                Route::resolve(&Method::Get, path),
                Route::InvalidItemId,
                "path {path}"
            );
        }
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(Route::resolve(&Method::Get, "/item"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::Get, "/itemsx"), Route::NotFound);
        assert_eq!(Route::resolve(&Method::Delete, "/"), Route::NotFound);
    }

    #[test]
    fn negative_ids_parse_and_fall_through_to_lookup() {
        assert_eq!(Route::resolve(&Method::Get, "/items/-1"), Route::GetItem(-1));
    }
}
