// SPDX-FileCopyrightText: Copyright (C) 2018-2025 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

pub mod filter;
pub use self::filter::{
    ActiveTab, CustomDateRange, DateFilter, DatePreset, Field, FieldValue, FilterSet,
    MultiSelect, SortBy,
};

pub mod fingerprint;
pub use self::fingerprint::{Fingerprint, fingerprint};

pub mod pagination;
pub use self::pagination::{PaginationInfo, paginate};

pub mod preset;
pub use self::preset::FilterPreset;

pub mod registry;
pub use self::registry::{EntityKind, EntityRegistry, RegistrySnapshot};

pub mod response;
pub use self::response::{ResponseEnvelope, ResponseMeta, ResponseStatus};

pub mod url_codec;
pub use self::url_codec::{EncodeError, URL_PARAM_PREFIX, UrlParams};

pub mod util;

pub mod validate;
pub use self::validate::{
    RawInput, RawValue, Rule, Sanitized, ValidationError, ValidationMode, Validator,
};

pub mod prelude {
    // Re-export trait methods from semval
    pub use semval::{IsValid, Validate as _};

    pub(crate) use semval::prelude::*;
}
