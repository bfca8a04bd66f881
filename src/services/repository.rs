//! 通用表仓储
//!
//! 对任意 `Record` 提供 list / get / create / update / upsert / delete，
//! 写入前先规范化并校验表单

use std::marker::PhantomData;

use crate::domain::record::{Draft, Record};
use crate::error::{ApiError, ApiResult};
use crate::infra::backend::{Auth, BackendClient};
use crate::infra::query::Query;

/// 表仓储
pub struct Repository<'a, T: Record> {
    backend: &'a BackendClient,
    _record: PhantomData<T>,
}

impl<'a, T: Record> Repository<'a, T> {
    pub fn new(backend: &'a BackendClient) -> Self {
        Self {
            backend,
            _record: PhantomData,
        }
    }

    /// 按默认排序查询，`filter` 为附加过滤条件
    pub async fn list(&self, filter: Query, auth: Auth<'_>) -> ApiResult<Vec<T>> {
        let query = filter.order(T::ORDER);
        Ok(self.backend.select(T::TABLE, &query, auth).await?)
    }

    /// 全部记录
    pub async fn list_all(&self, auth: Auth<'_>) -> ApiResult<Vec<T>> {
        self.list(Query::new(), auth).await
    }

    /// 按列查找第一条
    pub async fn find_one(&self, filter: Query, auth: Auth<'_>) -> ApiResult<Option<T>> {
        let query = filter.order(T::ORDER);
        Ok(self.backend.select_one(T::TABLE, &query, auth).await?)
    }

    /// 按主键获取，不存在返回 404
    pub async fn get(&self, key: &str, auth: Auth<'_>) -> ApiResult<T> {
        check_key::<T>(key)?;
        self.find_one(Query::new().eq(T::KEY, key), auth)
            .await?
            .ok_or_else(|| ApiError::not_found(T::TABLE))
    }

    /// 新建
    pub async fn create(&self, mut draft: T::Draft, auth: Auth<'_>) -> ApiResult<T> {
        draft.normalize();
        draft.validate()?;
        Ok(self.backend.insert(T::TABLE, &draft, auth).await?)
    }

    /// 新建但不读回记录
    pub async fn submit(&self, mut draft: T::Draft, auth: Auth<'_>) -> ApiResult<()> {
        draft.normalize();
        draft.validate()?;
        Ok(self.backend.insert_minimal(T::TABLE, &draft, auth).await?)
    }

    /// 按主键更新，不存在返回 404
    pub async fn update(&self, key: &str, mut draft: T::Draft, auth: Auth<'_>) -> ApiResult<T> {
        check_key::<T>(key)?;
        if T::RETAINS_ON_UPDATE {
            let current = self.get(key, auth).await?;
            current.retain_on_update(&mut draft);
        }
        draft.normalize();
        draft.validate()?;
        self.backend
            .update(T::TABLE, T::KEY, key, &draft, auth)
            .await?
            .ok_or_else(|| ApiError::not_found(T::TABLE))
    }

    /// 不校验表单的局部更新（如已读标记）
    pub async fn patch<P: serde::Serialize + ?Sized>(
        &self,
        key: &str,
        patch: &P,
        auth: Auth<'_>,
    ) -> ApiResult<T> {
        check_key::<T>(key)?;
        self.backend
            .update(T::TABLE, T::KEY, key, patch, auth)
            .await?
            .ok_or_else(|| ApiError::not_found(T::TABLE))
    }

    /// 插入或按主键合并
    pub async fn upsert(&self, mut draft: T::Draft, auth: Auth<'_>) -> ApiResult<T> {
        draft.normalize();
        draft.validate()?;
        Ok(self.backend.upsert(T::TABLE, T::KEY, &draft, auth).await?)
    }

    /// 按主键删除，不存在返回 404
    pub async fn delete(&self, key: &str, auth: Auth<'_>) -> ApiResult<()> {
        check_key::<T>(key)?;
        if self.backend.delete(T::TABLE, T::KEY, key, auth).await? {
            Ok(())
        } else {
            Err(ApiError::not_found(T::TABLE))
        }
    }
}

fn check_key<T: Record>(key: &str) -> ApiResult<()> {
    if T::is_valid_key(key) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!("Invalid {} key: {}", T::TABLE, key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Project, SiteSetting};

    #[test]
    fn test_check_key() {
        assert!(check_key::<Project>("6f9619ff-8b86-d011-b42d-00cf4fc964ff").is_ok());
        assert!(matches!(
            check_key::<Project>("../etc"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(check_key::<SiteSetting>("site.title").is_ok());
        assert!(check_key::<SiteSetting>("Site Title").is_err());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft_before_calling_backend() {
        // 未监听的地址：如果发出了请求会得到网络错误而不是校验错误
        let backend = BackendClient::new("http://127.0.0.1:9", "anon").unwrap();
        let repo: Repository<'_, Project> = Repository::new(&backend);
        let draft = serde_json::from_value(serde_json::json!({ "slug": "x" })).unwrap();

        let err = repo.create(draft, Auth::Anon).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
