/// A `&'static` value parsed from a literal the first time it is reached.
macro_rules! lazy_parsed {
    ($ty: ty, $parse: path, $e: expr) => {{
        static VALUE: ::once_cell::sync::Lazy<$ty> = ::once_cell::sync::Lazy::new(|| {
            $parse($e).unwrap_or_else(|err| panic!("Invalid pattern {:?}: {err}", $e))
        });
        &*VALUE
    }};
}

macro_rules! selector {
    ($e: expr) => {
        lazy_parsed!(::scraper::Selector, ::scraper::Selector::parse, $e)
    };
}

macro_rules! regex {
    ($e: expr) => {
        lazy_parsed!(::regex::Regex, ::regex::Regex::new, $e)
    };
}
