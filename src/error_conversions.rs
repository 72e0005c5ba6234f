//! Error conversion glue between layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the conversions live here instead of next to the types they convert.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use super::TypeConstraintError;
    use crate::forms::analytics::TrackEventFormError;
    use crate::forms::blog::CreateBlogPostFormError;
    use crate::forms::businesses::{
        ClaimBusinessFormError, CreateBusinessFormError, SearchBusinessesQueryError,
        UpdateBusinessFormError,
    };
    use crate::forms::categories::{AddCategoryFormError, SetCategoryParentFormError};
    use crate::forms::reviews::{CreateReviewFormError, ReviewResponseFormError};
    use crate::services::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    /// Every form error is reported to the client as a validation failure.
    macro_rules! form_errors_into_service_error {
        ($($error:ty),* $(,)?) => {
            $(impl From<$error> for ServiceError {
                fn from(val: $error) -> Self {
                    ServiceError::Form(val.to_string())
                }
            })*
        };
    }

    form_errors_into_service_error!(
        CreateBusinessFormError,
        UpdateBusinessFormError,
        ClaimBusinessFormError,
        SearchBusinessesQueryError,
        CreateReviewFormError,
        ReviewResponseFormError,
        TrackEventFormError,
        AddCategoryFormError,
        SetCategoryParentFormError,
        CreateBlogPostFormError,
    );
}
