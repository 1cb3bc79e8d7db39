/// Generate a cached cascade method for one data kind.
///
/// The generated method:
/// - returns the cached result when a fresh entry exists under `key`;
/// - otherwise walks the connectors that expose `accessor` through
///   [`Cascata::cascade`](crate::Cascata) and calls `call` on each;
/// - wraps the first success in a `FetchResult` tagged with that connector,
///   stores it, and returns it.
///
/// Exhaustion is returned as an error; each caller decides the degraded
/// result for its kind.
#[macro_export]
#[doc(hidden)]
macro_rules! cascata_router_method {
    (
        $(#[$meta:meta])*
        method: $name:ident( $( $arg_ident:ident : $arg_ty:ty ),* ) -> $ret:ty,
        kind: $kind:expr,
        accessor: $accessor:ident,
        call: $call_name:ident( $( $call_arg:ident ),* )
    ) => {
        $(#[$meta])*
        pub(crate) async fn $name(
            &self,
            symbol: &cascata_core::Symbol,
            key: cascata_cache::CacheKey,
            $( $arg_ident: $arg_ty ),*
        ) -> Result<cascata_core::FetchResult<$ret>, cascata_core::CascataError> {
            if let Some(hit) = self.cached_lookup::<$ret>(&key).await {
                return Ok(hit);
            }
            let (payload, source) = self
                .cascade(symbol, $kind, move |c| {
                    c.$accessor()?;
                    let sym = symbol.clone();
                    $( let $arg_ident = $arg_ident.clone(); )*
                    Some(async move {
                        match c.$accessor() {
                            Some(p) => p.$call_name(&sym $(, $call_arg )*).await,
                            None => Err(cascata_core::CascataError::unsupported(
                                $kind.as_str(),
                            )),
                        }
                    })
                })
                .await?;
            let result =
                cascata_core::FetchResult::ok(payload, cascata_core::Provenance::provider(source));
            self.store_result(key, &result).await;
            Ok(result)
        }
    };
}
