use crate::framework::{DescriptorError, ResourceDescriptor};
use crate::model::Tag;

pub fn tags() -> Result<ResourceDescriptor, DescriptorError> {
    ResourceDescriptor::for_type::<Tag>().attribute("name").build()
}
