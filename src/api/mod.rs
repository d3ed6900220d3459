pub mod overpass;

pub use overpass::{
    Element, ElementSource, FetchError, OverpassClient, OverpassResponse, build_activities_query,
    parse_response,
};
