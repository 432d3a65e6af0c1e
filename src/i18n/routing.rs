//! The website's localized pathnames.

use super::Locale;

/// A page's logical pathname and what it's called in each locale. Dynamic segments are written as
/// `[name]` and are never translated.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Pathname {
    /// The locale-independent pathname the website's code refers to the page by.
    logical: &'static str,

    /// The English pathname.
    en: &'static str,

    /// The Indonesian pathname.
    id: &'static str,
}

impl Pathname {
    /// A pathname that's the same in every locale.
    const fn shared(path: &'static str) -> Self {
        Self {
            logical: path,
            en: path,
            id: path,
        }
    }

    /// Gets the pathname in a locale.
    const fn localized(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.en,
            Locale::Id => self.id,
        }
    }
}

/// Every page of the website.
const PATHNAMES: [Pathname; 13] = [
    Pathname::shared("/"),
    Pathname {
        logical: "/products",
        en: "/products",
        id: "/produk",
    },
    Pathname {
        logical: "/products/[slug]",
        en: "/products/[slug]",
        id: "/produk/[slug]",
    },
    Pathname {
        logical: "/cart",
        en: "/cart",
        id: "/keranjang",
    },
    Pathname {
        logical: "/checkout",
        en: "/checkout",
        id: "/pembayaran",
    },
    Pathname {
        logical: "/orders/[token]",
        en: "/orders/[token]",
        id: "/pesanan/[token]",
    },
    Pathname {
        logical: "/about",
        en: "/about",
        id: "/tentang",
    },
    Pathname {
        logical: "/contact",
        en: "/contact",
        id: "/kontak",
    },
    Pathname {
        logical: "/login",
        en: "/login",
        id: "/masuk",
    },
    Pathname {
        logical: "/register",
        en: "/register",
        id: "/daftar",
    },
    Pathname::shared("/admin"),
    Pathname {
        logical: "/admin/products",
        en: "/admin/products",
        id: "/admin/produk",
    },
    Pathname {
        logical: "/admin/orders",
        en: "/admin/orders",
        id: "/admin/pesanan",
    },
];

/// Gets a page's pathname in a locale from its logical pathname, or `None` if there's no such page.
pub fn localize(logical: &str, locale: Locale) -> Option<&'static str> {
    PATHNAMES
        .iter()
        .find(|pathname| pathname.logical == logical)
        .map(|pathname| pathname.localized(locale))
}

/// Gets a page's logical pathname from its pathname in a locale, or `None` if there's no such page.
pub fn resolve(localized: &str, locale: Locale) -> Option<&'static str> {
    PATHNAMES
        .iter()
        .find(|pathname| pathname.localized(locale) == localized)
        .map(|pathname| pathname.logical)
}

/// Iterates over each page's logical pathname paired with its pathname in a locale.
pub fn pathnames(locale: Locale) -> impl Iterator<Item = (&'static str, &'static str)> {
    PATHNAMES
        .iter()
        .map(move |pathname| (pathname.logical, pathname.localized(locale)))
}
