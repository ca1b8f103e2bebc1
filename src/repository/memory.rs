//! In-memory repositories backing the unit and router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{
    Activity, ActivityRequest, Implement, ImplementRequest, Instrument, InstrumentRequest, Member,
    MemberPatch, NewMember, Participation, ParticipationChange, Role,
};
use crate::repository::{
    ActivityRepository, AssignmentOutcome, ImplementRepository, InstrumentRepository,
    MemberRepository,
};
use crate::utils::error::{AppError, AppResult};

#[derive(Default)]
pub struct MemoryActivityRepository {
    activities: Mutex<Vec<Activity>>,
}

impl MemoryActivityRepository {
    pub fn snapshot(&self, id: Uuid) -> Option<Activity> {
        let activities = self.activities.lock().unwrap();
        activities.iter().find(|a| a.id == id).cloned()
    }
}

#[async_trait]
impl ActivityRepository for MemoryActivityRepository {
    async fn list(&self) -> AppResult<Vec<Activity>> {
        Ok(self.activities.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Activity>> {
        Ok(self.snapshot(id))
    }

    async fn create(&self, details: &ActivityRequest, participants: &[Uuid]) -> AppResult<Activity> {
        let now = Utc::now();
        let activity = Activity {
            id: Uuid::new_v4(),
            title: details.title.trim().to_string(),
            description: details.description.trim().to_string(),
            date: details.date,
            time: details.time.clone(),
            location: details.location.trim().to_string(),
            participants: participants.iter().copied().map(Participation::pending).collect(),
            created_at: now,
            updated_at: now,
        };
        self.activities.lock().unwrap().push(activity.clone());
        Ok(activity)
    }

    async fn update_details(
        &self,
        id: Uuid,
        details: &ActivityRequest,
    ) -> AppResult<Option<Activity>> {
        let mut activities = self.activities.lock().unwrap();
        let Some(activity) = activities.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        activity.title = details.title.trim().to_string();
        activity.description = details.description.trim().to_string();
        activity.date = details.date;
        activity.time = details.time.clone();
        activity.location = details.location.trim().to_string();
        activity.updated_at = Utc::now();
        Ok(Some(activity.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<Activity>> {
        let mut activities = self.activities.lock().unwrap();
        let position = activities.iter().position(|a| a.id == id);
        Ok(position.map(|index| activities.remove(index)))
    }

    async fn set_participation(
        &self,
        activity_id: Uuid,
        member_id: Uuid,
        change: &ParticipationChange,
    ) -> AppResult<Option<Activity>> {
        let mut activities = self.activities.lock().unwrap();
        let Some(activity) = activities.iter_mut().find(|a| a.id == activity_id) else {
            return Ok(None);
        };
        let Some(entry) = activity
            .participants
            .iter_mut()
            .find(|p| p.member_id == member_id)
        else {
            return Ok(None);
        };
        change.apply_to(entry);
        Ok(Some(activity.clone()))
    }
}

/// Mirrors the `COALESCE` update of the Postgres repository.
fn apply_patch(patch: MemberPatch, member: &mut Member) {
    if let Some(username) = patch.username {
        member.username = username.trim().to_string();
    }
    if let Some(rut) = patch.rut {
        member.rut = rut;
    }
    if let Some(birthdate) = patch.birthdate {
        member.birthdate = birthdate;
    }
    if let Some(phone) = patch.phone {
        member.phone = phone;
    }
    if let Some(email) = patch.email {
        member.email = email.trim().to_string();
    }
    if let Some(instrument) = patch.instrument {
        member.instrument = Some(instrument);
    }
    if let Some(roles) = patch.roles {
        member.roles = roles;
    }
}

#[derive(Default)]
pub struct MemoryMemberRepository {
    members: Mutex<Vec<Member>>,
}

impl MemoryMemberRepository {
    /// Inserts a fixture member and returns it.
    pub fn seed(&self, username: &str, email: &str, roles: Vec<Role>) -> Member {
        let now = Utc::now();
        let count = self.members.lock().unwrap().len();
        let member = Member {
            id: Uuid::new_v4(),
            username: username.to_string(),
            rut: format!("{:08}-{}", 10_000_000 + count, count % 10),
            birthdate: NaiveDate::from_ymd_opt(1995, 1, 1).unwrap(),
            phone: "912345678".to_string(),
            email: email.to_string(),
            instrument: None,
            roles,
            created_at: now,
            updated_at: now,
        };
        self.members.lock().unwrap().push(member.clone());
        member
    }
}

#[async_trait]
impl MemberRepository for MemoryMemberRepository {
    async fn list(&self) -> AppResult<Vec<Member>> {
        Ok(self.members.lock().unwrap().clone())
    }

    async fn list_non_admin(&self) -> AppResult<Vec<Member>> {
        let members = self.members.lock().unwrap();
        Ok(members.iter().filter(|m| !m.is_admin()).cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Member>> {
        let members = self.members.lock().unwrap();
        Ok(members.iter().find(|m| m.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Member>> {
        let members = self.members.lock().unwrap();
        Ok(members
            .iter()
            .find(|m| m.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn create(&self, member: &NewMember) -> AppResult<Member> {
        let mut members = self.members.lock().unwrap();
        if members
            .iter()
            .any(|m| m.email.eq_ignore_ascii_case(&member.email) || m.rut == member.rut)
        {
            return Err(AppError::Conflict(
                "A member with that email or RUT already exists.".to_string(),
            ));
        }
        let now = Utc::now();
        let created = Member {
            id: Uuid::new_v4(),
            username: member.username.trim().to_string(),
            rut: member.rut.clone(),
            birthdate: member.birthdate,
            phone: member.phone.clone(),
            email: member.email.trim().to_string(),
            instrument: member.instrument.clone(),
            roles: member.roles.clone(),
            created_at: now,
            updated_at: now,
        };
        members.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, patch: MemberPatch) -> AppResult<Option<Member>> {
        let mut members = self.members.lock().unwrap();
        let Some(member) = members.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        apply_patch(patch, member);
        member.updated_at = Utc::now();
        Ok(Some(member.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<Member>> {
        let mut members = self.members.lock().unwrap();
        let position = members.iter().position(|m| m.id == id);
        Ok(position.map(|index| members.remove(index)))
    }
}

#[derive(Default)]
pub struct MemoryInstrumentRepository {
    instruments: Mutex<Vec<Instrument>>,
}

impl MemoryInstrumentRepository {
    fn set_assignment(
        &self,
        id: Uuid,
        assigned_to: Option<Uuid>,
    ) -> AppResult<AssignmentOutcome> {
        let mut instruments = self.instruments.lock().unwrap();
        let Some(instrument) = instruments.iter_mut().find(|i| i.id == id) else {
            return Ok(AssignmentOutcome::NotFound);
        };
        if instrument.assigned_to.is_some() == assigned_to.is_some() {
            return Ok(AssignmentOutcome::Unchanged);
        }
        instrument.assigned_to = assigned_to;
        instrument.updated_at = Utc::now();
        Ok(AssignmentOutcome::Updated(instrument.clone()))
    }
}

#[async_trait]
impl InstrumentRepository for MemoryInstrumentRepository {
    async fn list(&self) -> AppResult<Vec<Instrument>> {
        Ok(self.instruments.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Instrument>> {
        let instruments = self.instruments.lock().unwrap();
        Ok(instruments.iter().find(|i| i.id == id).cloned())
    }

    async fn create(&self, request: &InstrumentRequest) -> AppResult<Instrument> {
        let now = Utc::now();
        let instrument = Instrument {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            brand: request.brand.trim().to_string(),
            condition: request.condition.trim().to_string(),
            kind: request.kind.trim().to_string(),
            assigned_to: None,
            created_at: now,
            updated_at: now,
        };
        self.instruments.lock().unwrap().push(instrument.clone());
        Ok(instrument)
    }

    async fn update(
        &self,
        id: Uuid,
        request: &InstrumentRequest,
    ) -> AppResult<Option<Instrument>> {
        let mut instruments = self.instruments.lock().unwrap();
        let Some(instrument) = instruments.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        instrument.name = request.name.trim().to_string();
        instrument.brand = request.brand.trim().to_string();
        instrument.condition = request.condition.trim().to_string();
        instrument.kind = request.kind.trim().to_string();
        instrument.updated_at = Utc::now();
        Ok(Some(instrument.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<Instrument>> {
        let mut instruments = self.instruments.lock().unwrap();
        let position = instruments.iter().position(|i| i.id == id);
        Ok(position.map(|index| instruments.remove(index)))
    }

    async fn assign(&self, id: Uuid, member_id: Uuid) -> AppResult<AssignmentOutcome> {
        self.set_assignment(id, Some(member_id))
    }

    async fn unassign(&self, id: Uuid) -> AppResult<AssignmentOutcome> {
        self.set_assignment(id, None)
    }
}

#[derive(Default)]
pub struct MemoryImplementRepository {
    implements: Mutex<Vec<Implement>>,
}

#[async_trait]
impl ImplementRepository for MemoryImplementRepository {
    async fn list(&self) -> AppResult<Vec<Implement>> {
        Ok(self.implements.lock().unwrap().clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Implement>> {
        let implements = self.implements.lock().unwrap();
        Ok(implements.iter().find(|i| i.id == id).cloned())
    }

    async fn create(&self, request: &ImplementRequest) -> AppResult<Implement> {
        let now = Utc::now();
        let implement = Implement {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            instrument: request.instrument.trim().to_string(),
            stock: request.stock,
            created_at: now,
            updated_at: now,
        };
        self.implements.lock().unwrap().push(implement.clone());
        Ok(implement)
    }

    async fn update(&self, id: Uuid, request: &ImplementRequest) -> AppResult<Option<Implement>> {
        let mut implements = self.implements.lock().unwrap();
        let Some(implement) = implements.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };
        implement.name = request.name.trim().to_string();
        implement.instrument = request.instrument.trim().to_string();
        implement.stock = request.stock;
        implement.updated_at = Utc::now();
        Ok(Some(implement.clone()))
    }

    async fn delete(&self, id: Uuid) -> AppResult<Option<Implement>> {
        let mut implements = self.implements.lock().unwrap();
        let position = implements.iter().position(|i| i.id == id);
        Ok(position.map(|index| implements.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_member_patch_keeps_absent_fields() {
        let repo = MemoryMemberRepository::default();
        let ana = repo.seed("ana", "ana@example.com", vec![Role::Member]);

        let patch = MemberPatch {
            phone: Some("987654321".to_string()),
            ..Default::default()
        };
        let updated = repo.update(ana.id, patch).await.unwrap().unwrap();

        assert_eq!(updated.phone, "987654321");
        assert_eq!(updated.username, "ana");
        assert!(!updated.is_admin());
    }

    #[tokio::test]
    async fn test_inventory_text_is_trimmed() {
        let instruments = MemoryInstrumentRepository::default();
        let instrument = instruments
            .create(&InstrumentRequest {
                name: " Tuba ".to_string(),
                brand: "Yamaha ".to_string(),
                condition: " fair".to_string(),
                kind: "brass".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(
            (instrument.name.as_str(), instrument.brand.as_str(), instrument.condition.as_str()),
            ("Tuba", "Yamaha", "fair")
        );

        let implements = MemoryImplementRepository::default();
        let implement = implements
            .create(&ImplementRequest {
                name: " Reeds ".to_string(),
                instrument: " clarinet ".to_string(),
                stock: 12,
            })
            .await
            .unwrap();
        assert_eq!(implement.name, "Reeds");
        assert_eq!(implement.instrument, "clarinet");
    }
}
